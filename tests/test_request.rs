use thunder::http::request::{Method, Request};

fn request_for_path(path: &str) -> Request {
    Request {
        method: Method::GET,
        path: path.to_string(),
        content_type: String::new(),
        body: Vec::new(),
    }
}

#[test]
fn test_method_from_token() {
    assert_eq!(Method::from_token("GET"), Some(Method::GET));
    assert_eq!(Method::from_token("POST"), Some(Method::POST));
    assert_eq!(Method::from_token("PUT"), None);
    assert_eq!(Method::from_token("get"), None); // Case-sensitive
}

#[test]
fn test_method_as_str_round_trips() {
    assert_eq!(Method::from_token(Method::GET.as_str()), Some(Method::GET));
    assert_eq!(Method::from_token(Method::POST.as_str()), Some(Method::POST));
}

#[test]
fn test_file_name_is_final_path_segment() {
    assert_eq!(request_for_path("/index.html").file_name(), "index.html");
    assert_eq!(request_for_path("/a/b/c.css").file_name(), "c.css");
    assert_eq!(request_for_path("note.txt").file_name(), "note.txt");
}

#[test]
fn test_extension_of_final_segment() {
    assert_eq!(request_for_path("/index.html").extension(), "html");
    assert_eq!(request_for_path("/pics/cat.tar.gz").extension(), "gz");
}

#[test]
fn test_extension_of_dotless_name_is_whole_name() {
    // Resolves to application/{name} downstream, same as the wire rule
    assert_eq!(request_for_path("/readme").extension(), "readme");
}

#[test]
fn test_request_with_binary_body_keeps_bytes() {
    let body = vec![0u8, 159, 146, 150];
    let req = Request {
        method: Method::POST,
        path: "/upload".to_string(),
        content_type: "image/png".to_string(),
        body: body.clone(),
    };

    assert_eq!(req.body, body);
}
