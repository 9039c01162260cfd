//! Integration tests for saving pointer posts and importing featured images.
//!
//! A mock HTTP server (`httptest`) serves the pointed-to page and its image,
//! so no real network requests are made.

mod helpers;

use httptest::{matchers::*, responders::*, Expectation, Server};

use helpers::{create_test_pointer, files_under, page_with_image};
use page_pointer::{ErrorType, ImportOutcome, InfoType, SaveError, SavePost};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";

fn save(post_id: i64, url: &str, import: bool) -> SavePost {
    SavePost {
        post_id,
        url: Some(url.to_string()),
        import,
    }
}

#[tokio::test]
async fn test_save_without_import_stores_pointer_only() {
    let test = create_test_pointer().await;
    let outcome = test
        .pointer
        .save_post(save(1, "example.com/article", false))
        .await
        .expect("save should succeed");

    assert_eq!(outcome.url.as_deref(), Some("https://example.com/article"));
    assert_eq!(outcome.import, None);
    assert_eq!(
        test.pointer.redirect_target(1).await.expect("lookup").as_deref(),
        Some("https://example.com/article")
    );
    assert!(test.pointer.is_pointer(1).await.expect("lookup"));
    assert!(!test.pointer.is_pointer(2).await.expect("lookup"));
}

#[tokio::test]
async fn test_import_downloads_image_and_sets_featured() {
    let server = Server::run();
    let image_url = server.url("/images/photo.png").to_string();
    server.expect(
        Expectation::matching(request::method_path("GET", "/article"))
            .times(1)
            .respond_with(
                status_code(200)
                    .append_header("Content-Type", "text/html")
                    .body(page_with_image(&image_url)),
            ),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/images/photo.png"))
            .times(1)
            .respond_with(status_code(200).body(PNG_BYTES)),
    );

    let test = create_test_pointer().await;
    let page_url = server.url("/article").to_string();
    let outcome = test
        .pointer
        .save_post(save(7, &page_url, true))
        .await
        .expect("save should succeed");

    let (attachment_id, file_name) = match outcome.import {
        Some(ImportOutcome::Imported {
            attachment_id,
            file_name,
        }) => (attachment_id, file_name),
        other => panic!("expected an import, got {other:?}"),
    };
    assert_eq!(file_name, "photo.png");
    assert_eq!(
        test.pointer.posts().thumbnail_id(7).await.expect("thumbnail"),
        Some(attachment_id)
    );

    let files = files_under(test.uploads.path());
    assert_eq!(files.len(), 1);
    assert_eq!(std::fs::read(&files[0]).expect("read image"), PNG_BYTES);
    assert_eq!(
        test.pointer.stats().get_info_count(InfoType::ImageImported),
        1
    );
}

#[tokio::test]
async fn test_same_image_is_not_imported_twice() {
    let server = Server::run();
    let image_url = server.url("/photo.jpg").to_string();
    // The page is cached after the first save; the image is only downloaded once
    server.expect(
        Expectation::matching(request::method_path("GET", "/article"))
            .times(1)
            .respond_with(status_code(200).body(page_with_image(&image_url))),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/photo.jpg"))
            .times(1)
            .respond_with(status_code(200).body(PNG_BYTES)),
    );

    let test = create_test_pointer().await;
    let page_url = server.url("/article").to_string();
    let first = test
        .pointer
        .save_post(save(3, &page_url, true))
        .await
        .expect("first save");
    let second = test
        .pointer
        .save_post(save(3, &page_url, true))
        .await
        .expect("second save");

    let attachment_id = match first.import {
        Some(ImportOutcome::Imported { attachment_id, .. }) => attachment_id,
        other => panic!("expected an import, got {other:?}"),
    };
    assert_eq!(
        second.import,
        Some(ImportOutcome::AlreadyImported { attachment_id })
    );
    assert_eq!(files_under(test.uploads.path()).len(), 1);
    assert_eq!(
        test.pointer
            .stats()
            .get_info_count(InfoType::ImageAlreadyImported),
        1
    );
}

#[tokio::test]
async fn test_same_file_name_for_two_posts_gets_unique_names() {
    let server = Server::run();
    let first_image = server.url("/a/cover.png").to_string();
    let second_image = server.url("/b/cover.png").to_string();
    server.expect(
        Expectation::matching(request::method_path("GET", "/one"))
            .respond_with(status_code(200).body(page_with_image(&first_image))),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/two"))
            .respond_with(status_code(200).body(page_with_image(&second_image))),
    );
    for path in ["/a/cover.png", "/b/cover.png"] {
        server.expect(
            Expectation::matching(request::method_path("GET", path))
                .respond_with(status_code(200).body(PNG_BYTES)),
        );
    }

    let test = create_test_pointer().await;
    let one = test
        .pointer
        .save_post(save(1, &server.url("/one").to_string(), true))
        .await
        .expect("first save");
    let two = test
        .pointer
        .save_post(save(2, &server.url("/two").to_string(), true))
        .await
        .expect("second save");

    let names: Vec<String> = [one.import, two.import]
        .into_iter()
        .map(|outcome| match outcome {
            Some(ImportOutcome::Imported { file_name, .. }) => file_name,
            other => panic!("expected an import, got {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["cover.png", "cover-1.png"]);
}

#[tokio::test]
async fn test_non_image_does_not_block_save() {
    let server = Server::run();
    let document_url = server.url("/files/report.pdf").to_string();
    server.expect(
        Expectation::matching(request::method_path("GET", "/article"))
            .respond_with(status_code(200).body(page_with_image(&document_url))),
    );

    let test = create_test_pointer().await;
    let page_url = server.url("/article").to_string();
    let outcome = test
        .pointer
        .save_post(save(5, &page_url, true))
        .await
        .expect("save must succeed even though the import fails");

    match outcome.import {
        Some(ImportOutcome::Failed { reason }) => {
            assert_eq!(reason, "report.pdf is not a valid image. application/pdf")
        }
        other => panic!("expected a failed import, got {other:?}"),
    }
    assert_eq!(
        test.pointer.redirect_target(5).await.expect("lookup"),
        Some(page_url)
    );
    assert!(test.pointer.posts().import_flag(5).await.expect("flag"));
    assert!(files_under(test.uploads.path()).is_empty());
    assert_eq!(
        test.pointer
            .stats()
            .get_error_count(ErrorType::ImportNotAnImage),
        1
    );
}

#[tokio::test]
async fn test_image_download_failure_is_reported() {
    let server = Server::run();
    let image_url = server.url("/missing.png").to_string();
    server.expect(
        Expectation::matching(request::method_path("GET", "/article"))
            .respond_with(status_code(200).body(page_with_image(&image_url))),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/missing.png"))
            .respond_with(status_code(404)),
    );

    let test = create_test_pointer().await;
    let outcome = test
        .pointer
        .save_post(save(4, &server.url("/article").to_string(), true))
        .await
        .expect("save should succeed");

    match outcome.import {
        Some(ImportOutcome::Failed { reason }) => assert!(reason.contains("404"), "{reason}"),
        other => panic!("expected a failed import, got {other:?}"),
    }
    assert_eq!(
        test.pointer.posts().thumbnail_id(4).await.expect("thumbnail"),
        None
    );
}

#[tokio::test]
async fn test_page_without_image_reports_no_image() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/plain")).respond_with(
            status_code(200).body(r#"<meta property="og:title" content="No picture">"#),
        ),
    );

    let test = create_test_pointer().await;
    let outcome = test
        .pointer
        .save_post(save(8, &server.url("/plain").to_string(), true))
        .await
        .expect("save should succeed");
    assert_eq!(outcome.import, Some(ImportOutcome::NoImage));
}

#[tokio::test]
async fn test_unreachable_page_fails_import_only() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/down")).respond_with(status_code(503)),
    );

    let test = create_test_pointer().await;
    let outcome = test
        .pointer
        .save_post(save(9, &server.url("/down").to_string(), true))
        .await
        .expect("save should succeed");
    assert!(matches!(outcome.import, Some(ImportOutcome::Failed { .. })));
    assert!(test.pointer.is_pointer(9).await.expect("lookup"));
}

#[tokio::test]
async fn test_empty_url_clears_pointer() {
    let test = create_test_pointer().await;
    test.pointer
        .save_post(save(6, "https://example.com/", false))
        .await
        .expect("save");
    let outcome = test
        .pointer
        .save_post(SavePost {
            post_id: 6,
            url: Some("   ".to_string()),
            import: true,
        })
        .await
        .expect("clear");

    assert_eq!(outcome.url, None);
    assert_eq!(outcome.import, None);
    assert!(!test.pointer.is_pointer(6).await.expect("lookup"));
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let test = create_test_pointer().await;
    let err = test
        .pointer
        .save_post(save(1, "http://", false))
        .await
        .expect_err("a URL without a host cannot be a pointer");
    assert!(matches!(err, SaveError::InvalidUrl(_)));
    assert!(!test.pointer.is_pointer(1).await.expect("lookup"));
}

#[tokio::test]
async fn test_list_pointers_reports_urls_and_imports() {
    let server = Server::run();
    let image_url = server.url("/images/photo.png").to_string();
    server.expect(
        Expectation::matching(request::method_path("GET", "/article"))
            .respond_with(status_code(200).body(page_with_image(&image_url))),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/images/photo.png"))
            .respond_with(status_code(200).body(PNG_BYTES)),
    );

    let test = create_test_pointer().await;
    assert!(test.pointer.list_pointers().await.expect("list").is_empty());

    let page_url = server.url("/article").to_string();
    test.pointer
        .save_post(save(5, &page_url, true))
        .await
        .expect("save");
    test.pointer
        .save_post(save(3, "example.com/plain", false))
        .await
        .expect("save");
    test.pointer
        .save_post(save(8, "example.com/gone", false))
        .await
        .expect("save");
    test.pointer
        .save_post(SavePost {
            post_id: 8,
            url: None,
            import: false,
        })
        .await
        .expect("clear");

    let pointers = test.pointer.list_pointers().await.expect("list");
    let ids: Vec<i64> = pointers.iter().map(|summary| summary.post_id).collect();
    assert_eq!(ids, vec![3, 5]);

    assert_eq!(pointers[0].url, "https://example.com/plain");
    assert!(!pointers[0].import);
    assert_eq!(pointers[0].thumbnail_id, None);
    assert!(pointers[0].attachments.is_empty());

    assert_eq!(pointers[1].url, page_url);
    assert!(pointers[1].import);
    assert_eq!(pointers[1].attachments.len(), 1);
    assert_eq!(
        pointers[1].attachments[0].source_url.as_deref(),
        Some(image_url.as_str())
    );
    assert_eq!(pointers[1].thumbnail_id, Some(pointers[1].attachments[0].id));
}

#[tokio::test]
async fn test_forget_preview_refetches_page() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/article"))
            .times(2)
            .respond_with(status_code(200).body(page_with_image("https://example.com/a.png"))),
    );

    let test = create_test_pointer().await;
    let page_url = server.url("/article").to_string();
    test.pointer.preview(&page_url).await.expect("first preview");
    test.pointer.preview(&page_url).await.expect("cached preview");
    assert_eq!(test.pointer.stats().get_info_count(InfoType::CacheHit), 1);

    test.pointer.forget_preview(&page_url).await.expect("forget");
    test.pointer.preview(&page_url).await.expect("refreshed preview");
    assert_eq!(test.pointer.stats().get_info_count(InfoType::CacheMiss), 2);

    // Nothing is cached for a URL that cannot be a pointer
    test.pointer.forget_preview("http://").await.expect("forget invalid");
}
