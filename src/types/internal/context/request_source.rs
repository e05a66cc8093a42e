/// Where an operation was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    API,
    CLI,
    System,
}
