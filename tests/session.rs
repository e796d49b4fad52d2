// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;
use std::path::Path;

use iconcrop::server;
use iconcrop::session::{self, Session};
use iconcrop::{font, glyphmap, Error, GeometryHost, Options};
use tiny_http::Method;

const SQUARE: &str = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
                      <rect x='2' y='4' width='6' height='6'/></svg>";

const EMPTY: &str = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'/>";

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

fn icon_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.svg", SQUARE);
    write(dir.path(), "a.SVG", SQUARE);
    write(dir.path(), "c.svg", SQUARE);
    write(dir.path(), "notes.txt", "not an icon");
    fs::create_dir(dir.path().join("sub.svg")).unwrap();
    dir
}

#[test]
fn icons_are_sorted() {
    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();

    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap();
    assert_eq!(session.len(), 3);
    assert_eq!(session.remaining(), 3);

    let names: Vec<_> = std::iter::from_fn(|| session.next_icon())
        .map(|icon| icon.unwrap().name)
        .collect();
    assert_eq!(names, vec!["a.SVG", "b.svg", "c.svg"]);
    assert_eq!(session.remaining(), 0);
    assert!(session.next_icon().is_none());
}

#[test]
fn restart() {
    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();

    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap();
    session.next_icon().unwrap().unwrap();
    session.next_icon().unwrap().unwrap();

    write(svg_dir.path(), "0.svg", SQUARE);
    session.restart().unwrap();
    assert_eq!(session.len(), 4);
    assert_eq!(session.next_icon().unwrap().unwrap().name, "0.svg");
}

#[test]
fn crop_and_save() {
    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();

    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap();
    let icon = session.next_icon().unwrap().unwrap();
    assert_eq!(icon.source, SQUARE);

    let cropped = session.crop_icon(&icon).unwrap();
    assert!(cropped.contains("viewBox=\"2 4 6 6\""));

    let path = session.save(&icon.name, &cropped).unwrap();
    assert_eq!(path, out_dir.path().join("a.SVG"));
    assert_eq!(fs::read_to_string(path).unwrap(), cropped);
}

#[test]
fn custom_host() {
    let svg_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write(
        svg_dir.path(),
        "em.svg",
        "<svg xmlns='http://www.w3.org/2000/svg'><rect width='2em' height='1em'/></svg>",
    );

    let host = GeometryHost::new(Options {
        font_size: 10.0,
        ..Options::default()
    });
    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap().with_host(host);
    let icon = session.next_icon().unwrap().unwrap();
    assert!(session.crop_icon(&icon).unwrap().contains("viewBox=\"0 0 20 10\""));

    // The default font size is 16.
    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap();
    let icon = session.next_icon().unwrap().unwrap();
    assert!(session.crop_icon(&icon).unwrap().contains("viewBox=\"0 0 32 16\""));
}

#[test]
fn save_stays_in_output_dir() {
    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();
    let session = Session::new(svg_dir.path(), out_dir.path()).unwrap();

    let path = session.save("../../escape.svg", SQUARE).unwrap();
    assert_eq!(path, out_dir.path().join("escape.svg"));

    assert!(matches!(session.save("..", SQUARE), Err(Error::Io(_))));
}

#[test]
fn crop_failure() {
    let svg_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write(svg_dir.path(), "empty.svg", EMPTY);

    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap();
    let icon = session.next_icon().unwrap().unwrap();
    assert!(matches!(session.crop_icon(&icon), Err(Error::EmptyVisibleSet)));
}

#[test]
fn distinct_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();

    assert!(session::ensure_distinct_dirs(dir.path(), other.path()).is_ok());
    assert!(session::ensure_distinct_dirs(dir.path(), &dir.path().join("out")).is_ok());
    assert!(matches!(
        session::ensure_distinct_dirs(dir.path(), dir.path()),
        Err(Error::SameDirectory)
    ));
    assert!(matches!(
        session::ensure_distinct_dirs(dir.path(), &dir.path().join(".")),
        Err(Error::SameDirectory)
    ));
}

#[test]
fn server_flow() {
    let svg_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write(svg_dir.path(), "a.svg", SQUARE);
    write(svg_dir.path(), "b.svg", EMPTY);
    write(svg_dir.path(), "c.svg", SQUARE);

    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap();

    let reply = server::handle(&mut session, &Method::Get, "/", b"");
    assert_eq!(reply.status, 200);
    assert!(!reply.finished);
    assert!(reply.html.contains("name=\"start\""));

    let reply = server::handle(&mut session, &Method::Post, "/crop", b"start=1");
    assert!(!reply.finished);
    assert!(reply.html.contains("<h1>a.svg</h1>"));
    assert!(reply.html.contains("viewBox=\"2 4 6 6\""));
    assert!(reply.html.contains("1 of 3"));

    // An edited icon is saved as is. `b.svg` can't be cropped and is skipped.
    let reply = server::handle(
        &mut session,
        &Method::Post,
        "/crop",
        b"name=a.svg&content=%3Csvg%2F%3E",
    );
    assert!(!reply.finished);
    assert!(reply.html.contains("<h1>c.svg</h1>"));
    assert!(reply.html.contains("Failed to crop b.svg"));
    assert_eq!(fs::read_to_string(out_dir.path().join("a.svg")).unwrap(), "<svg/>");

    let reply = server::handle(
        &mut session,
        &Method::Post,
        "/crop",
        b"name=c.svg&content=%3Csvg+viewBox%3D%220+0+1+1%22%2F%3E",
    );
    assert!(reply.finished);
    assert!(reply.html.contains("<h1>Done</h1>"));
    assert_eq!(
        fs::read_to_string(out_dir.path().join("c.svg")).unwrap(),
        "<svg viewBox=\"0 0 1 1\"/>"
    );
    assert!(!out_dir.path().join("b.svg").exists());
}

#[test]
fn server_without_form() {
    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap();

    let reply = server::handle(&mut session, &Method::Post, "/crop", b"");
    assert!(reply.html.contains("<h1>Done</h1>"));
    assert!(!reply.finished);
    assert_eq!(session.remaining(), 3);

    let reply = server::handle(&mut session, &Method::Get, "/favicon.ico", b"");
    assert_eq!(reply.status, 404);
}

#[test]
fn server_rejects_binary_body() {
    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(svg_dir.path(), out_dir.path()).unwrap();

    let reply = server::handle(&mut session, &Method::Post, "/crop", &[b's', 0xff, 0xfe]);
    assert_eq!(reply.status, 400);
    assert!(reply.html.contains("400 Bad Request"));
    assert!(!reply.finished);
    // Nothing was started.
    assert_eq!(session.remaining(), 3);
    assert!(fs::read_dir(out_dir.path()).unwrap().next().is_none());
}

#[test]
fn font_glyph_map() {
    let out_dir = tempfile::tempdir().unwrap();
    write(
        out_dir.path(),
        "info.json",
        r#"{
            "home": { "encodedCode": "\\ea01", "unicode": "&#59905;" },
            "add": { "encodedCode": "\\ea02" }
        }"#,
    );

    let path = font::write_glyph_map(out_dir.path()).unwrap();
    assert_eq!(path, out_dir.path().join(glyphmap::FILE_NAME));
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "{\n  \"home\": \"\\\\ea01\",\n  \"add\": \"\\\\ea02\"\n}"
    );
}

#[test]
fn font_skip_generator() {
    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();
    write(out_dir.path(), "info.json", r#"{ "add": { "encodedCode": "\\ea02" } }"#);

    let opt = font::Options {
        font_name: "Icons".to_string(),
        svg_dir: svg_dir.path().to_path_buf(),
        out_dir: out_dir.path().to_path_buf(),
        generator: None,
        skip_generator: true,
    };
    assert!(font::generate(&opt).is_ok());

    let opt = font::Options {
        out_dir: svg_dir.path().to_path_buf(),
        ..opt
    };
    assert!(matches!(font::generate(&opt), Err(Error::SameDirectory)));
}

#[cfg(unix)]
#[test]
fn font_generator() {
    use std::os::unix::fs::PermissionsExt;

    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();
    let bin_dir = tempfile::tempdir().unwrap();

    // Records its arguments and config, then writes what `svgtofont` would.
    let generator = bin_dir.path().join("svgtofont");
    fs::write(
        &generator,
        r#"#!/bin/sh
echo "$*" > args.txt
cp .svgtofontrc rc.json
cat > info.json <<'EOF'
{ "home": { "encodedCode": "\\ea01", "unicode": "&#59905;" } }
EOF
"#,
    )
    .unwrap();
    fs::set_permissions(&generator, fs::Permissions::from_mode(0o755)).unwrap();

    let opt = font::Options {
        font_name: "Icons".to_string(),
        svg_dir: svg_dir.path().to_path_buf(),
        out_dir: out_dir.path().join("font"),
        generator: Some(generator),
        skip_generator: false,
    };
    let path = font::generate(&opt).unwrap();
    let out = opt.out_dir.as_path();

    assert_eq!(fs::read_to_string(path).unwrap(), "{\n  \"home\": \"\\\\ea01\"\n}");

    let args = fs::read_to_string(out.join("args.txt")).unwrap();
    assert!(args.contains("--sources /"));
    assert!(args.contains("--output /"));
    assert!(args.ends_with("--fontName Icons\n"));

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("rc.json")).unwrap()).unwrap();
    assert_eq!(config["generateInfoData"], true);
    assert_eq!(config["css"], false);
    assert!(!out.join(".svgtofontrc").exists());
}

#[cfg(unix)]
#[test]
fn generator_without_info() {
    use std::os::unix::fs::PermissionsExt;

    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();
    let bin_dir = tempfile::tempdir().unwrap();

    let generator = bin_dir.path().join("svgtofont");
    fs::write(&generator, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&generator, fs::Permissions::from_mode(0o755)).unwrap();

    let opt = font::Options {
        font_name: "Icons".to_string(),
        svg_dir: svg_dir.path().to_path_buf(),
        out_dir: out_dir.path().to_path_buf(),
        generator: Some(generator),
        skip_generator: false,
    };
    assert!(matches!(font::generate(&opt), Err(Error::GeneratorFailed(_))));
}

#[test]
fn missing_generator() {
    let svg_dir = icon_dir();
    let out_dir = tempfile::tempdir().unwrap();

    let opt = font::Options {
        font_name: "Icons".to_string(),
        svg_dir: svg_dir.path().to_path_buf(),
        out_dir: out_dir.path().to_path_buf(),
        generator: Some(svg_dir.path().join("no-such-generator")),
        skip_generator: false,
    };
    assert!(matches!(font::generate(&opt), Err(Error::GeneratorFailed(_))));
}

#[test]
fn icomoon_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("selection.json");
    fs::write(
        &input,
        r#"{ "icons": [ { "properties": { "name": "home", "code": 59648 } } ] }"#,
    )
    .unwrap();

    let path = glyphmap::convert_icomoon_file(&input).unwrap();
    assert_eq!(path, dir.path().join("glyphmap.json"));
    assert_eq!(fs::read_to_string(path).unwrap(), r#"{"home":59648}"#);
}
