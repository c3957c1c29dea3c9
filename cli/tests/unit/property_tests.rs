//! Property-based tests for the push stream and project-derived paths.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use k_installer::application::services::transfer::write_push_stream;
use k_installer::domain::ProjectType;
use k_installer::domain::project::{parse_port, validate_project_name};

use crate::mocks::{parse_push, project};

fn encode(filename: &str, content: &[u8]) -> Vec<u8> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let mut out = Vec::new();
    rt.block_on(write_push_stream(&mut out, filename, content))
        .expect("write");
    out
}

proptest! {
    /// The receiving side recovers exactly the bytes that were sent.
    #[test]
    fn prop_push_stream_is_framed_by_its_header(
        content in proptest::collection::vec(any::<u8>(), 0..4096),
        filename in "[a-z_-]{1,16}",
    ) {
        let received = parse_push("scp -qrt ~/.ssh", &encode(&filename, &content));
        prop_assert_eq!(received.mode, "C0644");
        prop_assert_eq!(received.filename, filename);
        prop_assert_eq!(received.content, content);
    }

    /// Any 1-4 digit port is accepted as given.
    #[test]
    fn prop_short_numeric_ports_parse(port in 0u16..10_000) {
        prop_assert_eq!(parse_port(&port.to_string()).expect("valid"), port);
    }

    /// Remote URL omits the default port and carries any other.
    #[test]
    fn prop_remote_url_port_rendering(port in 1u16..10_000) {
        let mut p = project(ProjectType::WordPress);
        p.port = port;
        let url = p.remote_repo_url();
        if port == 22 {
            prop_assert!(url.starts_with("ssh://blog@example.org/"));
        } else {
            let authority = format!("ssh://blog@example.org:{port}/");
            prop_assert!(url.starts_with(&authority));
        }
        prop_assert!(url.ends_with("/home/blog/private/repos/blog_hub.git"));
    }

    /// Names with whitespace never validate.
    #[test]
    fn prop_names_with_spaces_are_rejected(head in "[a-z]{1,8}", tail in "[a-z]{1,8}") {
        let name = format!("{head} {tail}");
        prop_assert!(validate_project_name(&name).is_err());
    }
}
