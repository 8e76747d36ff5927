pub const DOCS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Kiyo Prime API</title>
</head>
<body>
<h1>Kiyo Prime API</h1>
<p>Every request must send the <code>Api-Key</code> header.</p>
<table>
<tr><th>Method</th><th>Path</th><th>Description</th></tr>
<tr><td>GET</td><td>/status</td><td>Liveness check.</td></tr>
<tr><td>POST</td><td>/api/v2/predictions</td><td>Classify an image. Form fields: <code>img_url</code>, <code>predictor</code>. Returns <code>prediction_id</code>.</td></tr>
<tr><td>GET</td><td>/api/v2/predictions</td><td>List predictions, newest first.</td></tr>
<tr><td>GET</td><td>/api/v2/predictions/{id}</td><td>Fetch one prediction.</td></tr>
<tr><td>PATCH</td><td>/api/v2/predictions/{id}</td><td>Record a human answer. Form field: <code>human_answer</code>.</td></tr>
</table>
</body>
</html>
"#;
