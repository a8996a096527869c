//! Client factory: assembles the chains and hands out clients.

use std::sync::Arc;

use time::Duration;

use super::{Client, Transport};
use crate::config::Config;
use crate::domain::filters::{
    DuplicateErrorFilter, ExcludeErrorKindFilter, ExcludeLocalRequestFilter, HttpStatusFilter,
    KindMatcher, RequestField, RequestMapFilter, StripWrappedErrorFilter,
};
use crate::domain::{AfterSend, AfterSendChain, BeforeSend, BeforeSendChain, FilterError, RequestDetails};

/// Default suppression window of the built-in duplicate filter.
const DEFAULT_DUPLICATE_TTL: Duration = Duration::seconds(60);

/// Builds [`Client`]s that share one pair of chains.
///
/// The duplicate filter is injected at construction: run-last in the
/// before-send chain and as an after-send observer, so it fingerprints the
/// error as left by every other filter.
pub struct ClientFactory {
    before: Arc<BeforeSendChain>,
    after: Arc<AfterSendChain>,
    transport: Arc<dyn Transport>,
    duplicate: Option<Arc<DuplicateErrorFilter>>,
    version: Option<String>,
    request_scoped: bool,
}

impl ClientFactory {
    /// Factory with the built-in duplicate filter and nothing else.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::assemble(
            transport,
            Some(Arc::new(DuplicateErrorFilter::new(DEFAULT_DUPLICATE_TTL))),
        )
    }

    /// Factory with the filters described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if a kind pattern is not a valid regex.
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Result<Self, FilterError> {
        let duplicate = if config.duplicate.enabled {
            let ttl_secs = i64::try_from(config.duplicate.ttl_secs)
                .map_err(|_| FilterError::Config("duplicate.ttl_secs is too large".to_string()))?;
            Some(Arc::new(
                DuplicateErrorFilter::new(Duration::seconds(ttl_secs))
                    .with_strategy(config.duplicate.strategy, config.duplicate.stack_depth),
            ))
        } else {
            None
        };

        let mut factory = Self::assemble(transport, duplicate).request_scoped(config.request_scoped);
        if let Some(version) = &config.version {
            factory = factory.with_version(version.clone());
        }

        if !config.unwrap.is_empty() {
            let wrappers = KindMatcher::from_lists(&config.unwrap.kinds, &config.unwrap.patterns)?;
            factory = factory.with_before_send(Arc::new(StripWrappedErrorFilter::new(wrappers)));
        }

        let exclude = &config.exclude;
        if !exclude.kinds.is_empty() || !exclude.patterns.is_empty() {
            let matchers = KindMatcher::from_lists(&exclude.kinds, &exclude.patterns)?;
            factory = factory.with_before_send(Arc::new(ExcludeErrorKindFilter::new(matchers)));
        }
        if !exclude.status_codes.is_empty() {
            factory = factory.with_before_send(Arc::new(HttpStatusFilter::new(
                exclude.status_codes.iter().copied(),
            )));
        }
        if exclude.local_requests {
            factory = factory.with_before_send(Arc::new(ExcludeLocalRequestFilter));
        }

        let redact = &config.redact;
        for (field, keys) in [
            (RequestField::QueryString, &redact.query_string),
            (RequestField::Headers, &redact.headers),
            (RequestField::Form, &redact.form),
            (RequestField::Cookies, &redact.cookies),
        ] {
            if !keys.is_empty() {
                let filter = RequestMapFilter::new(field, keys.clone())
                    .replace_with(redact.replacement.clone());
                factory = factory.with_before_send(Arc::new(filter));
            }
        }

        Ok(factory)
    }

    fn assemble(transport: Arc<dyn Transport>, duplicate: Option<Arc<DuplicateErrorFilter>>) -> Self {
        let before = BeforeSendChain::new();
        let after = AfterSendChain::new();
        if let Some(filter) = &duplicate {
            before.register_run_last(filter.clone());
            after.register(filter.clone());
        }

        Self {
            before: Arc::new(before),
            after: Arc::new(after),
            transport,
            duplicate,
            version: None,
            request_scoped: false,
        }
    }

    /// Add a before-send filter.
    pub fn with_before_send(self, filter: Arc<dyn BeforeSend>) -> Self {
        self.before.register(filter);
        self
    }

    /// Add an after-send observer.
    pub fn with_after_send(self, observer: Arc<dyn AfterSend>) -> Self {
        self.after.register(observer);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Require [`ClientFactory::new_client_for`] instead of [`ClientFactory::new_client`].
    pub fn request_scoped(mut self, request_scoped: bool) -> Self {
        self.request_scoped = request_scoped;
        self
    }

    /// Client without request context.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::RequestContextRequired`] on a request-scoped factory.
    pub fn new_client(&self) -> Result<Client, FilterError> {
        if self.request_scoped {
            return Err(FilterError::RequestContextRequired);
        }
        Ok(self.client(None))
    }

    /// Client bound to the request being served.
    pub fn new_client_for(&self, request: RequestDetails) -> Client {
        self.client(Some(request))
    }

    fn client(&self, request: Option<RequestDetails>) -> Client {
        Client {
            before: Arc::clone(&self.before),
            after: Arc::clone(&self.after),
            transport: Arc::clone(&self.transport),
            version: self.version.clone(),
            request,
        }
    }

    pub fn before_send_chain(&self) -> &Arc<BeforeSendChain> {
        &self.before
    }

    pub fn after_send_chain(&self) -> &Arc<AfterSendChain> {
        &self.after
    }

    pub fn duplicate_filter(&self) -> Option<&Arc<DuplicateErrorFilter>> {
        self.duplicate.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{ErrorDetail, Report, SendOutcome, SendStatus};

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<Report>>,
        fail: bool,
    }

    impl Transport for Recorder {
        fn send(&self, report: &Report) -> SendOutcome {
            self.sent.lock().unwrap().push(report.clone());
            if self.fail {
                SendOutcome::Failed {
                    status: Some(503),
                    reason: "unavailable".to_string(),
                }
            } else {
                SendOutcome::Delivered { status: Some(202) }
            }
        }
    }

    struct Tag(&'static str);

    impl BeforeSend for Tag {
        fn name(&self) -> &str {
            self.0
        }

        fn on_before_send(&self, mut report: Report) -> Option<Report> {
            report.tags.push(self.0.to_string());
            Some(report)
        }
    }

    fn wrapped(message: &str) -> Report {
        Report::new(
            ErrorDetail::new("javax.servlet.ServletException", "wrapper")
                .caused_by(ErrorDetail::new("java.io.IOException", message)),
        )
    }

    #[test]
    fn test_duplicate_filter_runs_last() {
        let factory = ClientFactory::new(Arc::new(Recorder::default()))
            .with_before_send(Arc::new(Tag("user")));
        assert_eq!(
            factory.before_send_chain().filter_names(),
            vec!["user", "duplicate-error"]
        );
        assert_eq!(factory.after_send_chain().observer_names(), vec!["duplicate-error"]);
    }

    #[test]
    fn test_second_delivery_of_same_error_is_suppressed() {
        let transport = Arc::new(Recorder::default());
        let factory = ClientFactory::new(transport.clone());
        let client = factory.new_client().unwrap();

        assert!(matches!(client.send(wrapped("disk")), SendStatus::Attempted(_)));
        assert_eq!(client.send(wrapped("disk")), SendStatus::Cancelled);
        assert!(matches!(client.send(wrapped("other")), SendStatus::Attempted(_)));
        assert_eq!(transport.sent.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_delivery_allows_retry() {
        let transport = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let client = ClientFactory::new(transport.clone()).new_client().unwrap();

        client.send(wrapped("disk"));
        client.send(wrapped("disk"));
        assert_eq!(transport.sent.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicates_detected_after_unwrapping() {
        let mut config = Config::default();
        config.unwrap.kinds = vec!["javax.servlet.ServletException".to_string()];
        let transport = Arc::new(Recorder::default());
        let factory = ClientFactory::from_config(&config, transport.clone()).unwrap();
        let client = factory.new_client().unwrap();

        client.send(wrapped("disk"));
        // Same root cause under a different wrapper message.
        let rewrapped = Report::new(
            ErrorDetail::new("javax.servlet.ServletException", "another wrapper")
                .caused_by(ErrorDetail::new("java.io.IOException", "disk")),
        );
        assert_eq!(client.send(rewrapped), SendStatus::Cancelled);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].error.kind, "java.io.IOException");
    }

    #[test]
    fn test_request_scoped_factory_rejects_contextless_client() {
        let factory = ClientFactory::new(Arc::new(Recorder::default())).request_scoped(true);
        assert!(matches!(
            factory.new_client(),
            Err(FilterError::RequestContextRequired)
        ));

        let mut request = RequestDetails::default();
        request.url = "/checkout".to_string();
        let client = factory.new_client_for(request);
        assert_eq!(client.request().unwrap().url, "/checkout");
    }

    #[test]
    fn test_client_stamps_version_and_request() {
        let transport = Arc::new(Recorder::default());
        let factory = ClientFactory::new(transport.clone()).with_version("3.2.1");
        let mut request = RequestDetails::default();
        request.host_name = "shop.example.com".to_string();
        let client = factory.new_client_for(request);

        client.send(Report::new(ErrorDetail::new("E", "m")));
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].version.as_deref(), Some("3.2.1"));
        assert_eq!(sent[0].request.as_ref().unwrap().host_name, "shop.example.com");
    }

    #[test]
    fn test_from_config_builds_configured_filters() {
        let mut config = Config::default();
        config.duplicate.enabled = false;
        config.unwrap.kinds = vec!["W".to_string()];
        config.exclude.status_codes = vec![404];
        config.exclude.local_requests = true;
        config.redact.query_string = vec!["password".to_string()];
        config.redact.cookies = vec!["session".to_string()];

        let factory = ClientFactory::from_config(&config, Arc::new(Recorder::default())).unwrap();
        assert_eq!(
            factory.before_send_chain().filter_names(),
            vec![
                "strip-wrapped-error",
                "http-status",
                "exclude-local-request",
                "redact-query-string",
                "redact-cookies",
            ]
        );
        assert!(factory.after_send_chain().is_empty());
        assert!(factory.duplicate_filter().is_none());
    }

    #[test]
    fn test_status_filter_cancels_before_transport() {
        let mut config = Config::default();
        config.exclude.status_codes = vec![404];
        let transport = Arc::new(Recorder::default());
        let client = ClientFactory::from_config(&config, transport.clone())
            .unwrap()
            .new_client()
            .unwrap();

        let report = Report::new(ErrorDetail::new("E", "m")).with_response_status(404);
        assert_eq!(client.send(report), SendStatus::Cancelled);
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
