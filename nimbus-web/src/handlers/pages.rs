//! Server-rendered dashboard page.
//!
//! One HTML page listing every torrent with live-ish statistics. Action
//! buttons call the JSON API with credentials kept in sessionStorage; the
//! page reloads itself while any download is active, matching the
//! statistics refresh cadence.

use axum::extract::State;
use axum::response::Html;
use nimbus_core::torrent::{TorrentStatus, TorrentView};

use crate::server::AppState;

/// Renders the dashboard with all torrents and summary stats.
pub async fn dashboard_page(State(state): State<AppState>) -> Html<String> {
    let mut views = state.manager.list().await.unwrap_or_default();
    views.sort_by(|a, b| a.added_at.cmp(&b.added_at));

    let downloading = views
        .iter()
        .filter(|v| v.status == TorrentStatus::Downloading)
        .count();
    let completed = views
        .iter()
        .filter(|v| v.status == TorrentStatus::Completed)
        .count();
    let total_speed: f64 = views.iter().map(|v| v.download_speed).sum();

    let rows: String = if views.is_empty() {
        r#"<tr><td colspan="8" class="empty">No torrents yet. Paste a magnet link above.</td></tr>"#
            .to_string()
    } else {
        views.iter().map(torrent_row).collect()
    };

    let auto_refresh = if downloading > 0 {
        "setTimeout(() => location.reload(), 3000);"
    } else {
        ""
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Nimbus</title>
<style>
  body {{ font-family: system-ui, sans-serif; background: #10151c; color: #d7dde6; margin: 0; }}
  header {{ padding: 1rem 2rem; border-bottom: 1px solid #232b36; display: flex; align-items: baseline; gap: 1.5rem; }}
  h1 {{ margin: 0; font-size: 1.3rem; }}
  .stats {{ color: #7d8894; font-size: 0.9rem; }}
  main {{ padding: 1.5rem 2rem; }}
  form.add {{ display: flex; gap: 0.5rem; margin-bottom: 1.5rem; }}
  input {{ background: #1a212b; border: 1px solid #2c3642; color: #d7dde6; padding: 0.45rem 0.6rem; border-radius: 4px; }}
  input[name=magnet] {{ flex: 1; }}
  button {{ background: #2563eb; border: 0; color: white; padding: 0.45rem 0.9rem; border-radius: 4px; cursor: pointer; }}
  button.ghost {{ background: #273140; }}
  table {{ width: 100%; border-collapse: collapse; }}
  th, td {{ text-align: left; padding: 0.5rem 0.6rem; border-bottom: 1px solid #1d2530; font-size: 0.9rem; }}
  .bar {{ background: #1a212b; border-radius: 3px; height: 8px; width: 140px; }}
  .bar > div {{ background: #2563eb; border-radius: 3px; height: 8px; }}
  .status-completed {{ color: #34d399; }}
  .status-paused {{ color: #fbbf24; }}
  .status-downloading {{ color: #60a5fa; }}
  .status-error {{ color: #f87171; }}
  .empty {{ color: #7d8894; text-align: center; padding: 2rem; }}
</style>
</head>
<body>
<header>
  <h1>Nimbus</h1>
  <span class="stats">{downloading} downloading &middot; {completed} completed &middot; {speed} total</span>
</header>
<main>
  <form class="add" onsubmit="addMagnet(event)">
    <input name="magnet" placeholder="magnet:?xt=urn:btih:..." required>
    <button type="submit">Add magnet</button>
  </form>
  <table>
    <thead>
      <tr><th>Name</th><th>Status</th><th>Progress</th><th>Down</th><th>Up</th><th>Peers / Seeds</th><th>Size</th><th></th></tr>
    </thead>
    <tbody>
      {rows}
    </tbody>
  </table>
</main>
<script>
function creds() {{
  let u = sessionStorage.getItem('nimbus-user');
  let p = sessionStorage.getItem('nimbus-pass');
  if (!u || !p) {{
    u = prompt('Username');
    p = prompt('Password');
    sessionStorage.setItem('nimbus-user', u);
    sessionStorage.setItem('nimbus-pass', p);
  }}
  return 'username=' + encodeURIComponent(u) + '&password=' + encodeURIComponent(p);
}}
async function call(url, method) {{
  const sep = url.includes('?') ? '&' : '?';
  const response = await fetch(url + sep + creds(), {{ method: method }});
  const body = await response.json();
  if (!body.success) {{
    if (body.message === 'Authentication failed') {{
      sessionStorage.removeItem('nimbus-user');
      sessionStorage.removeItem('nimbus-pass');
    }}
    alert(body.message);
  }}
  location.reload();
}}
function addMagnet(event) {{
  event.preventDefault();
  const magnet = event.target.elements.magnet.value;
  call('/api/torrents/magnet?magnet=' + encodeURIComponent(magnet), 'POST');
}}
{auto_refresh}
</script>
</body>
</html>"#,
        downloading = downloading,
        completed = completed,
        speed = format_speed(total_speed),
        rows = rows,
        auto_refresh = auto_refresh,
    );

    Html(html)
}

/// Renders one torrent as a table row.
fn torrent_row(view: &TorrentView) -> String {
    let name = escape_html(&view.name);
    let eta = view
        .eta
        .as_deref()
        .map(|eta| format!(" &middot; eta {eta}"))
        .unwrap_or_default();

    let actions = match view.status {
        TorrentStatus::Downloading => format!(
            r#"<button class="ghost" onclick="call('/api/torrents/{id}/pause', 'POST')">Pause</button>"#,
            id = view.id
        ),
        TorrentStatus::Paused => format!(
            r#"<button class="ghost" onclick="call('/api/torrents/{id}/resume', 'POST')">Resume</button>"#,
            id = view.id
        ),
        TorrentStatus::Completed => format!(
            r#"<a href="/api/torrents/{id}/archive"><button class="ghost">Download zip</button></a>"#,
            id = view.id
        ),
        TorrentStatus::Error => String::new(),
    };

    format!(
        r#"<tr>
  <td>{name}</td>
  <td class="status-{status}">{status}</td>
  <td><div class="bar"><div style="width:{progress}%"></div></div> {progress:.1}%{eta}</td>
  <td>{down}</td>
  <td>{up}</td>
  <td>{peers} / {seeds}</td>
  <td>{size}</td>
  <td>{actions}
      <button class="ghost" onclick="call('/api/torrents/{id}', 'DELETE')">Delete</button></td>
</tr>"#,
        name = name,
        status = view.status,
        progress = view.progress,
        eta = eta,
        down = format_speed(view.download_speed),
        up = format_speed(view.upload_speed),
        peers = view.peers,
        seeds = view.seeds,
        size = format_bytes(view.total_size),
        actions = actions,
        id = view.id,
    )
}

/// Renders a byte count with a binary unit suffix.
fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

    let bytes = bytes as f64;
    if bytes >= GIB {
        format!("{:.2} GB", bytes / GIB)
    } else if bytes >= MIB {
        format!("{:.2} MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{:.2} KB", bytes / KIB)
    } else {
        format!("{bytes:.0} B")
    }
}

/// Renders a KB/s rate, switching to MB/s above 1024.
fn format_speed(kbps: f64) -> String {
    if kbps >= 1024.0 {
        format!("{:.1} MB/s", kbps / 1024.0)
    } else {
        format!("{kbps:.1} KB/s")
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_format_speed_switches_to_mbps() {
        assert_eq!(format_speed(512.0), "512.0 KB/s");
        assert_eq!(format_speed(2048.0), "2.0 MB/s");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A & B"</b>"#),
            "&lt;b&gt;&quot;A &amp; B&quot;&lt;/b&gt;"
        );
    }
}
