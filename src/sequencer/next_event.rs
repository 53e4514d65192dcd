/// Request kinds and the response kind that completes each.
///
/// This is the only place that knows how a backend operation completes. Adding a new
/// operation kind is a one-line edit here.
const COMPLETIONS: &[(&str, &str)] = &[
    ("scan", "scan-result"),
    ("query", "query-result"),
    ("batch-request", "batch-response"),
];

/// The backend event that completes a request of `kind`, if the kind is known.
pub fn next_event(kind: &str) -> Option<&'static str> {
    COMPLETIONS
        .iter()
        .find(|(request, _)| *request == kind)
        .map(|(_, response)| *response)
}

/// True when `kind` is a request kind with a defined completion.
pub fn is_request(kind: &str) -> bool {
    next_event(kind).is_some()
}

/// True when `kind` is the completion of some request kind.
pub fn is_completion(kind: &str) -> bool {
    COMPLETIONS.iter().any(|(_, response)| *response == kind)
}
