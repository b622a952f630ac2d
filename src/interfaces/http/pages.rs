//! Server-rendered HTML pages.
//!
//! The upload form keeps the exact structure browsers rely on: one multipart
//! POST form with no `action`, one required file input and one submit button.

use crate::domain::upload::StoredUpload;

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, stylesheet_url: Option<&str>, body: &str) -> String {
    let stylesheet = stylesheet_url
        .map(|url| format!("    <script src=\"{}\"></script>\n", escape_html(url)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
{stylesheet}</head>
<body>
{body}</body>
</html>
"#,
        title = escape_html(title),
        stylesheet = stylesheet,
        body = body
    )
}

fn notice(message: Option<&str>) -> String {
    message
        .map(|msg| format!("    <p role=\"alert\">{}</p>\n", escape_html(msg)))
        .unwrap_or_default()
}

pub fn upload_form(stylesheet_url: Option<&str>, accept: &str, message: Option<&str>) -> String {
    let body = format!(
        r#"    <h1>Upload File CSV untuk Model ARIMA</h1>
{notice}    <form method="POST" enctype="multipart/form-data">
        <label for="file">Pilih File CSV:</label>
        <input type="file" id="file" name="file" accept="{accept}" required>
        <br><br>
        <button type="submit">Upload dan Prediksi</button>
    </form>
"#,
        notice = notice(message),
        accept = escape_html(accept)
    );
    layout("Upload CSV untuk ARIMA", stylesheet_url, &body)
}

pub fn login_page(stylesheet_url: Option<&str>, error: Option<&str>) -> String {
    let body = format!(
        r#"    <h1>Login Admin</h1>
{notice}    <form method="POST">
        <label for="username">Username:</label>
        <input type="text" id="username" name="username" required>
        <br><br>
        <label for="password">Password:</label>
        <input type="password" id="password" name="password" required>
        <br><br>
        <button type="submit">Login</button>
    </form>
"#,
        notice = notice(error)
    );
    layout("Login", stylesheet_url, &body)
}

pub fn dashboard_page(stylesheet_url: Option<&str>, username: &str, upload_path: &str) -> String {
    let body = format!(
        r#"    <h1>Dashboard Admin</h1>
    <p>Masuk sebagai {username}.</p>
    <ul>
        <li><a href="{upload_path}">Upload CSV untuk ARIMA</a></li>
        <li><a href="/logout">Logout</a></li>
    </ul>
"#,
        username = escape_html(username),
        upload_path = escape_html(upload_path)
    );
    layout("Dashboard Admin", stylesheet_url, &body)
}

pub fn receipt_page(stylesheet_url: Option<&str>, stored: &StoredUpload, upload_path: &str) -> String {
    let body = format!(
        r#"    <h1>File Diterima</h1>
    <dl>
        <dt>Nama file</dt><dd>{original}</dd>
        <dt>Disimpan sebagai</dt><dd>{stored}</dd>
        <dt>Ukuran</dt><dd>{size} byte</dd>
        <dt>SHA-256</dt><dd><code>{sha256}</code></dd>
        <dt>Diterima</dt><dd>{received}</dd>
    </dl>
    <p><a href="{upload_path}">Upload file lain</a></p>
"#,
        original = escape_html(&stored.original_filename),
        stored = escape_html(&stored.stored_filename),
        size = stored.size_bytes,
        sha256 = stored.sha256,
        received = stored.received_at.format("%Y-%m-%d %H:%M:%S UTC"),
        upload_path = escape_html(upload_path)
    );
    layout("File Diterima", stylesheet_url, &body)
}
