//! HTTP request handlers organized by functionality

pub mod api;
pub mod pages;

pub use api::{
    api_add_descriptor, api_add_magnet, api_delete_file, api_delete_torrent,
    api_download_archive, api_get_torrent, api_list_files, api_list_torrents,
    api_pause_torrent, api_resume_torrent,
};
pub use pages::dashboard_page;
