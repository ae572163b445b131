//! Landing page.

use axum::response::Html;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>File Hub API</title>
<style>
  * { font-family: 'Arial', sans-serif; color: white; box-sizing: border-box; padding: 0; margin: 0; }
  body { background-color: #191622; height: 100vh; width: 100%; display: grid; place-items: center; }
  p { margin-top: 15px; }
  a { color: #ff79c6; }
</style>
</head>
<body>
  <div>
    <h1>File Hub API</h1>
    <p>File API: <a href="/files">/files</a></p>
    <p>Web API: <a href="/data">/data</a></p>
  </div>
</body>
</html>
"#;

/// GET / - Landing page linking both APIs.
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
