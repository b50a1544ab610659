//! Scripted engine used by the test suites.
//!
//! Plays the protocol engine's role hermetically: queries replay scripted
//! callback streams in order, calls are recorded with their encoded
//! arguments, and session releases and stop signals are counted so lifecycle
//! contracts can be asserted.

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicU32, AtomicUsize, Ordering},
};

use parking_lot::Mutex;

use crate::{
    collect::Flow,
    config::PropertyStore,
    engine::{AckCallback, AttrsCallback, Engine, ServicesCallback, TypesCallback},
    error::ErrorCode,
    url::ServiceUrl,
};

/// One scripted callback delivery.
pub(crate) enum Delivery {
    /// Payload and code for a service-type or attribute callback.
    Payload(&'static str, ErrorCode),
    /// URL, lifetime, and code for a service callback.
    Service(&'static str, u16, ErrorCode),
    /// Terminal code for an acknowledgement-only callback.
    Ack(ErrorCode),
}

struct Reply {
    top: ErrorCode,
    deliveries: Vec<Delivery>,
}

pub(crate) struct ScriptedEngine {
    props: PropertyStore,
    replies: Mutex<VecDeque<Reply>>,
    scope_replies: Mutex<VecDeque<Result<String, ErrorCode>>>,
    open_error: Mutex<Option<ErrorCode>>,
    calls: Mutex<Vec<String>>,
    next_session: AtomicU32,
    closed: AtomicUsize,
    stops: AtomicUsize,
}

impl ScriptedEngine {
    pub(crate) fn new() -> Self {
        Self {
            props: PropertyStore::new(),
            replies: Mutex::new(VecDeque::new()),
            scope_replies: Mutex::new(VecDeque::new()),
            open_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            next_session: AtomicU32::new(1),
            closed: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    /// Scripts the next streaming call: its top-level return code and the
    /// callback deliveries leading up to it.
    pub(crate) fn push_reply(&self, top: ErrorCode, deliveries: Vec<Delivery>) {
        self.replies.lock().push_back(Reply { top, deliveries });
    }

    /// Scripts the next `find_scopes` outcome.
    pub(crate) fn push_scopes(&self, reply: Result<&str, ErrorCode>) {
        self.scope_replies
            .lock()
            .push_back(reply.map(str::to_string));
    }

    /// Makes the next `open` fail with `code`.
    pub(crate) fn fail_open(&self, code: ErrorCode) {
        *self.open_error.lock() = Some(code);
    }

    /// Every call issued so far, with its encoded arguments.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// How many sessions have been released.
    pub(crate) fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// How many times a callback told the engine to stop streaming.
    pub(crate) fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn next_reply(&self, default: Reply) -> Reply {
        self.replies.lock().pop_front().unwrap_or(default)
    }

    fn note_stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn run_ack(&self, callback: AckCallback<'_>) -> ErrorCode {
        let reply = self.next_reply(Reply {
            top: ErrorCode::Ok,
            deliveries: vec![Delivery::Ack(ErrorCode::Ok)],
        });
        for delivery in reply.deliveries {
            let Delivery::Ack(code) = delivery else {
                panic!("acknowledgement call scripted with a payload delivery");
            };
            if callback(code) == Flow::Stop {
                self.note_stop();
                break;
            }
        }
        reply.top
    }

    fn run_payloads(&self, callback: &mut dyn FnMut(&str, ErrorCode) -> Flow) -> ErrorCode {
        let reply = self.next_reply(Reply {
            top: ErrorCode::Ok,
            deliveries: vec![Delivery::Payload("", ErrorCode::LastCall)],
        });
        for delivery in reply.deliveries {
            let Delivery::Payload(payload, code) = delivery else {
                panic!("payload call scripted with a mismatched delivery");
            };
            if callback(payload, code) == Flow::Stop {
                self.note_stop();
                break;
            }
        }
        reply.top
    }

    fn run_services(&self, callback: ServicesCallback<'_>) -> ErrorCode {
        let reply = self.next_reply(Reply {
            top: ErrorCode::Ok,
            deliveries: vec![Delivery::Service("", 0, ErrorCode::LastCall)],
        });
        for delivery in reply.deliveries {
            let Delivery::Service(url, lifetime, code) = delivery else {
                panic!("service call scripted with a mismatched delivery");
            };
            if callback(url, lifetime, code) == Flow::Stop {
                self.note_stop();
                break;
            }
        }
        reply.top
    }
}

const RESERVED: &[char] = &['(', ')', ',', '\\', '!', '<', '=', '>', '~'];

impl Engine for ScriptedEngine {
    type Session = u32;

    fn open(&self, lang: &str, is_async: bool) -> Result<u32, ErrorCode> {
        if let Some(code) = self.open_error.lock().take() {
            return Err(code);
        }
        self.record(format!("open lang={lang} async={is_async}"));
        Ok(self.next_session.fetch_add(1, Ordering::SeqCst))
    }

    fn close(&self, _session: u32) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }

    fn register(
        &self,
        _session: &mut u32,
        url: &str,
        lifetime: u16,
        attrs: &str,
        callback: AckCallback<'_>,
    ) -> ErrorCode {
        self.record(format!("register url={url} lifetime={lifetime} attrs={attrs}"));
        self.run_ack(callback)
    }

    fn deregister(&self, _session: &mut u32, url: &str, callback: AckCallback<'_>) -> ErrorCode {
        self.record(format!("deregister url={url}"));
        self.run_ack(callback)
    }

    fn delete_attributes(
        &self,
        _session: &mut u32,
        url: &str,
        attr_ids: &str,
        callback: AckCallback<'_>,
    ) -> ErrorCode {
        self.record(format!("delete-attributes url={url} ids={attr_ids}"));
        self.run_ack(callback)
    }

    fn find_service_types(
        &self,
        _session: &mut u32,
        naming_authority: &str,
        scopes: &str,
        callback: TypesCallback<'_>,
    ) -> ErrorCode {
        self.record(format!(
            "find-service-types authority={naming_authority} scopes={scopes}"
        ));
        self.run_payloads(callback)
    }

    fn find_services(
        &self,
        _session: &mut u32,
        service_type: &str,
        scopes: &str,
        filter: &str,
        callback: ServicesCallback<'_>,
    ) -> ErrorCode {
        self.record(format!(
            "find-services type={service_type} scopes={scopes} filter={filter}"
        ));
        self.run_services(callback)
    }

    fn find_attributes(
        &self,
        _session: &mut u32,
        url: &str,
        scopes: &str,
        attr_ids: &str,
        callback: AttrsCallback<'_>,
    ) -> ErrorCode {
        self.record(format!(
            "find-attributes url={url} scopes={scopes} ids={attr_ids}"
        ));
        self.run_payloads(callback)
    }

    fn find_scopes(&self, _session: &mut u32) -> Result<String, ErrorCode> {
        self.record("find-scopes".to_string());
        self.scope_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok("default".to_string()))
    }

    fn parse_service_url(&self, url: &str) -> Result<ServiceUrl, ErrorCode> {
        let rest = url.strip_prefix("service:").ok_or(ErrorCode::ParseError)?;
        let (type_part, rest) = rest.split_once("://").ok_or(ErrorCode::ParseError)?;
        let (service_type, naming_authority) = match type_part.split_once('.') {
            Some((base, authority)) => (format!("service:{base}"), authority.to_string()),
            None => (format!("service:{type_part}"), String::new()),
        };
        let (host_part, path) = match rest.split_once('/') {
            Some((host, tail)) => (host, format!("/{tail}")),
            None => (rest, String::new()),
        };
        let (host, port) = match host_part.split_once(':') {
            Some((host, port)) => (
                host.to_string(),
                port.parse().map_err(|_| ErrorCode::ParseError)?,
            ),
            None => (host_part.to_string(), 0),
        };
        Ok(ServiceUrl {
            service_type,
            naming_authority,
            host,
            port,
            path,
        })
    }

    fn escape(&self, text: &str, is_tag: bool) -> Result<String, ErrorCode> {
        if is_tag && text.contains('*') {
            return Err(ErrorCode::ParameterBad);
        }
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if RESERVED.contains(&ch) || ch.is_control() {
                out.push_str(&format!("\\{:02X}", ch as u32));
            } else {
                out.push(ch);
            }
        }
        Ok(out)
    }

    fn unescape(&self, text: &str, _is_tag: bool) -> Result<String, ErrorCode> {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            let hi = chars.next().ok_or(ErrorCode::ParseError)?;
            let lo = chars.next().ok_or(ErrorCode::ParseError)?;
            let value = u32::from_str_radix(&format!("{hi}{lo}"), 16)
                .map_err(|_| ErrorCode::ParseError)?;
            out.push(char::from_u32(value).ok_or(ErrorCode::ParseError)?);
        }
        Ok(out)
    }

    fn get_property(&self, name: &str) -> Option<String> {
        self.props.get(name)
    }

    fn set_property(&self, name: &str, value: &str) {
        self.props.set(name, value);
    }
}
