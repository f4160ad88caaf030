pub fn render_landing_page() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>FIT Distance</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 0; padding: 0; background: #f3f4f6; }
    main { max-width: 500px; margin: 4rem auto; background: white; padding: 1.5rem; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
    h1 { margin-top: 0; }
    p { color: #4b5563; }
    button { margin-top: 1.5rem; width: 100%; background: black; color: white; border: none; padding: 0.75rem; border-radius: 6px; cursor: pointer; font-weight: bold; }
    button:hover { background: #1f2937; }
  </style>
</head>
<body>
  <main>
    <h1>FIT Distance</h1>
    <p>Calculate speed and distance &plusmn;5% using power information. Based on data from a Stages SC3 bike.</p>
    <form action="/upload" method="post" enctype="multipart/form-data">
      <label for="file-upload">Upload FIT file</label>
      <input id="file-upload" name="file" type="file" accept=".fit" required />
      <button type="submit">Update</button>
    </form>
  </main>
</body>
</html>"#
        .to_string()
}
