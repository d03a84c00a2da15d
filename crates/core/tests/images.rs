//! Tests for image preloading.

use domsnap_core::dom::parse_html;
use domsnap_core::images::{
    collect_images, load_images, resolve_source, ImageError, ImageLoadReport, ImageLoader,
};
use domsnap_core::DomNode;
use futures::executor::block_on;
use futures::future::{self, BoxFuture, FutureExt};
use std::sync::Mutex;
use url::Url;

#[derive(Default)]
struct RecordingLoader {
    calls: Mutex<Vec<String>>,
}

impl RecordingLoader {
    fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

impl ImageLoader for RecordingLoader {
    fn load<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), ImageError>> {
        self.calls.lock().unwrap().push(url.to_string());
        let result = if url.contains("broken") {
            Err(ImageError::Load {
                url: url.to_string(),
                reason: "404".to_string(),
            })
        } else {
            Ok(())
        };
        future::ready(result).boxed()
    }
}

#[test]
fn test_empty_input_returns_without_loading() {
    let loader = RecordingLoader::default();
    let report = block_on(load_images(&[], None, &loader));
    assert_eq!(report, ImageLoadReport::default());
    assert!(loader.calls().is_empty());
}

#[test]
fn test_failures_still_settle() {
    let html = r#"
    <body>
        <img src="a.png">
        <div><img src="broken.png"></div>
        <img alt="no source">
        <img src="https://cdn.example.net/logo.svg">
    </body>
    "#;
    let tree = parse_html(html);
    let images = collect_images(&tree);
    assert_eq!(images.len(), 4);

    let base = Url::parse("https://example.com/docs/").unwrap();
    let loader = RecordingLoader::default();
    let report = block_on(load_images(&images, Some(&base), &loader));

    assert_eq!(report, ImageLoadReport { loaded: 2, failed: 2 });
    assert_eq!(report.total(), images.len());
    assert_eq!(
        loader.calls(),
        vec![
            "https://cdn.example.net/logo.svg",
            "https://example.com/docs/a.png",
            "https://example.com/docs/broken.png",
        ]
    );
}

#[test]
fn test_relative_source_needs_a_base() {
    let mut img = DomNode::new_element("img");
    img.set_attr("src", "photo.jpg");
    assert!(matches!(
        resolve_source(&img, None),
        Err(ImageError::InvalidUrl { .. })
    ));

    let loader = RecordingLoader::default();
    let report = block_on(load_images(&[&img], None, &loader));
    assert_eq!(report, ImageLoadReport { loaded: 0, failed: 1 });
    assert!(loader.calls().is_empty());
}

#[test]
fn test_resolve_source_variants() {
    let mut img = DomNode::new_element("img");
    assert_eq!(resolve_source(&img, None), Err(ImageError::MissingSource));

    img.set_attr("src", "   ");
    assert_eq!(resolve_source(&img, None), Err(ImageError::MissingSource));

    img.set_attr("src", "data:image/png;base64,AAAA");
    assert_eq!(
        resolve_source(&img, None).unwrap(),
        "data:image/png;base64,AAAA"
    );

    let base = Url::parse("https://example.com/a/b/page.html").unwrap();
    img.set_attr("src", "../img/x.png");
    assert_eq!(
        resolve_source(&img, Some(&base)).unwrap(),
        "https://example.com/a/img/x.png"
    );
}
