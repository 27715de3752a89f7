use super::*;

#[test]
fn extracts_token_among_other_cookies() {
    assert_eq!(
        extract_csrf_token("sessionid=abc; csrftoken=Tok3n; theme=dark"),
        "Tok3n"
    );
}

#[test]
fn extracts_token_when_it_is_the_only_cookie() {
    assert_eq!(extract_csrf_token("csrftoken=xyz"), "xyz");
}

#[test]
fn keeps_equals_signs_inside_the_value() {
    assert_eq!(extract_csrf_token("csrftoken=a=b==; x=1"), "a=b==");
}

#[test]
fn missing_cookie_yields_empty_string() {
    assert_eq!(extract_csrf_token(""), "");
    assert_eq!(extract_csrf_token("sessionid=abc; theme=dark"), "");
}

#[test]
fn similarly_named_cookies_do_not_match() {
    assert_eq!(extract_csrf_token("xcsrftoken=nope; csrftokenx=nope"), "");
}

#[test]
fn first_matching_cookie_wins() {
    assert_eq!(extract_csrf_token("csrftoken=first; csrftoken=second"), "first");
}

#[test]
fn empty_value_is_returned_as_is() {
    assert_eq!(extract_csrf_token("csrftoken=; a=b"), "");
}

#[test]
fn cookie_string_is_read_at_call_time() {
    let cookies = CookieString::new("csrftoken=one");
    assert_eq!(cookies.csrf_token(), "one");
    cookies.set("csrftoken=two");
    assert_eq!(cookies.csrf_token(), "two");
}

#[test]
fn jar_source_reads_cookies_for_its_url() {
    let url: Url = "http://shop.test/".parse().expect("url");
    let jar = Arc::new(Jar::default());
    jar.add_cookie_str("csrftoken=from-jar; Path=/", &url);
    let source = JarTokenSource::new(jar, url);
    assert_eq!(source.csrf_token(), "from-jar");
}

#[test]
fn empty_jar_yields_empty_token() {
    let url: Url = "http://shop.test/".parse().expect("url");
    let source = JarTokenSource::new(Arc::new(Jar::default()), url);
    assert_eq!(source.csrf_token(), "");
}
