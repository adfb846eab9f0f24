use std::env;
use std::fs;
use std::path::Path;

// rust-embed 要求 frontend/dist 存在；前端未构建时写入一个占位页面
fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let dist = Path::new(&manifest_dir).join("frontend/dist");
    if dist.join("index.html").exists() {
        return;
    }

    println!("cargo:warning=frontend/dist not found, embedding a placeholder page");
    if let Err(e) = write_placeholder(&dist) {
        println!("cargo:warning=failed to write placeholder frontend: {e}");
    }
}

fn write_placeholder(dist: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dist.join("assets"))?;
    fs::write(
        dist.join("index.html"),
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Faculty Evaluation</title>
</head>
<body>
    <h1>Faculty Evaluation</h1>
    <p>The web client has not been built. Run <code>npm install &amp;&amp; npm run build</code> in <code>frontend/</code>.</p>
</body>
</html>
"#,
    )
}
