// End-to-end checks of the public loading surface: the per-kind loaders,
// the dispatcher, and the callback adapters.
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use image_loader::data_url;
use image_loader::{Blob, FileHandle, ImageContent, ImageInput, ImageLoader, LoadError, LoaderConfig};
use serde_json::json;

fn unique_temp_dir(tag: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock error")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("image-loader-{tag}-{nanos}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn loader() -> ImageLoader {
    ImageLoader::new(LoaderConfig::default()).expect("loader init failed")
}

#[tokio::test]
async fn file_loads_as_data_url_with_file_name() {
    let dir = unique_temp_dir("file");
    let content = [0xFF_u8, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    let path = dir.join("photo.png");
    std::fs::write(&path, content).expect("write file failed");

    let loaded = loader().load_file(&FileHandle::new(&path)).await.expect("load file failed");

    let ImageContent::FromFile { src, alt } = loaded.content() else {
        panic!("expected a file result");
    };
    assert_eq!(alt, "photo.png");
    let decoded = data_url::parse(src).expect("src is a data url");
    assert_eq!(decoded.bytes, content);
    assert_eq!(decoded.mime.as_deref(), Some("image/jpeg"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn blob_url_dereferences_until_released() {
    let loader = loader();
    let loaded = loader.load_blob(&Blob::new(&b"raw pixels"[..])).expect("load blob failed");
    let src = loaded.src().to_string();

    let resolved = loader.registry().resolve(&src).expect("url should resolve");
    assert_eq!(resolved.bytes().as_ref(), b"raw pixels");

    let content = loaded.release();
    assert_eq!(content, ImageContent::FromBlob { src: src.clone() });
    assert!(loader.registry().resolve(&src).is_none());
}

#[tokio::test]
async fn dispatcher_matches_per_kind_loaders() {
    let dir = unique_temp_dir("dispatch");
    let path = dir.join("cover.gif");
    std::fs::write(&path, b"GIF89a").expect("write file failed");
    let loader = loader();

    let via_dispatch = loader.load_anything("cover.png".into()).await.expect("dispatch string");
    let direct = loader.load_string("cover.png").expect("load string");
    assert_eq!(via_dispatch.content(), direct.content());

    let file = FileHandle::new(&path);
    let via_dispatch = loader.load_anything(file.clone().into()).await.expect("dispatch file");
    let direct = loader.load_file(&file).await.expect("load file");
    assert_eq!(via_dispatch.content(), direct.content());
    assert!(via_dispatch.src().starts_with("data:image/gif;base64,"));

    let via_dispatch = loader
        .load_anything(ImageInput::Blob(Blob::new(&b"x"[..])))
        .await
        .expect("dispatch blob");
    assert!(matches!(via_dispatch.content(), ImageContent::FromBlob { .. }));
    assert!(via_dispatch.has_release());
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn dispatcher_classifies_dynamic_values() {
    let dir = unique_temp_dir("value");
    let path = dir.join("x.bin");
    std::fs::write(&path, b"abc").expect("write file failed");
    let loader = loader();

    let text = loader.load_value(&json!("a.png")).await.expect("string value");
    assert_eq!(text.content(), &ImageContent::FromString { src: "a.png".to_string() });

    let file = loader
        .load_value(&json!({ "file": path.to_string_lossy(), "name": "photo.png" }))
        .await
        .expect("file value");
    assert_eq!(file.content().alt(), Some("photo.png"));

    let err = loader.load_value(&json!(42)).await.expect_err("42 is not loadable");
    assert!(matches!(err, LoadError::Unrecognized(_)));
    assert_eq!(err.to_string(), "prop `42` is not a valid loadable object");
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn callbacks_fire_exactly_once_per_call() {
    let dir = unique_temp_dir("callbacks");
    let path = dir.join("photo.png");
    std::fs::write(&path, b"abc").expect("write file failed");
    let loader = loader();
    let fired = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for input in [
        ImageInput::Text("a.png".to_string()),
        ImageInput::Text(String::new()),
        ImageInput::Blob(Blob::new(&b"x"[..])),
        ImageInput::File(FileHandle::new(&path)),
        ImageInput::File(FileHandle::new(dir.join("missing.png"))),
    ] {
        let sink = Arc::clone(&fired);
        let kind = input.kind();
        if let Some(handle) = loader.load_anything_with(input, move |result| {
            sink.lock().expect("lock fired").push((kind, result.is_ok()));
        }) {
            handles.push(handle);
        }
    }
    for handle in handles {
        handle.await.expect("load task panicked");
    }

    let mut fired = fired.lock().expect("lock fired").clone();
    fired.sort();
    assert_eq!(
        fired,
        vec![("blob", true), ("file", false), ("file", true), ("string", false), ("string", true)]
    );
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn default_entry_points_use_shared_loader() {
    let loaded = image_loader::load_anything("logo.svg").await.expect("load string");
    assert_eq!(loaded.src(), "logo.svg");

    let blob = image_loader::load_blob(&Blob::new(&b"y"[..])).expect("load blob");
    assert!(image_loader::default_loader().registry().resolve(blob.src()).is_some());

    let err = image_loader::load_value(&json!(null)).await.expect_err("null is not loadable");
    assert_eq!(err.to_string(), "prop `null` is not a valid loadable object");
}
