/// One `Accept` header to benchmark with.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    accept: &'static str,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, accept: &'static str) -> Self {
        Self { name, group, accept }
    }

    pub fn small(name: &'static str, accept: &'static str) -> Self {
        Self::new(name, TestGroup::Small, accept)
    }

    pub fn normal(name: &'static str, accept: &'static str) -> Self {
        Self::new(name, TestGroup::Normal, accept)
    }

    pub fn large(name: &'static str, accept: &'static str) -> Self {
        Self::new(name, TestGroup::Large, accept)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn accept(&self) -> &'static str {
        self.accept
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

pub const CURL_ACCEPT: &str = "*/*";

pub const API_CLIENT_ACCEPT: &str = "application/x-yaml;q=0.8, application/json";

pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

pub const PICKY_ACCEPT: &str = "application/json;q=0, application/x-yaml;q=0.1, application/*;q=0.5, \
    text/plain;format=flowed;q=0.4, text/plain;q=0.3, text/*;q=0.2, image/png, image/*;q=0.9, \
    application/xml;q=0.9, application/vnd.api+json;version=2;q=0.95, */*;q=0.01";

pub fn test_cases() -> Vec<TestCase> {
    vec![
        TestCase::small("curl", CURL_ACCEPT),
        TestCase::normal("api_client", API_CLIENT_ACCEPT),
        TestCase::normal("browser", BROWSER_ACCEPT),
        TestCase::large("picky", PICKY_ACCEPT),
    ]
}
