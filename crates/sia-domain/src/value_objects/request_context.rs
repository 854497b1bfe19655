//! Client request metadata
//!
//! The audit recorder never reads ambient state; whatever is known about
//! the client travels in one of these, passed explicitly by the caller.

use crate::constants::{AGENTE_DESCONOCIDO, IP_DESCONOCIDA, IP_NO_DISPONIBLE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum ContextKind {
    /// Built from an inbound request
    Client,
    /// Batch or internal action with no request behind it
    System,
}

/// Client IP and user-agent for audit metadata. Both are optional;
/// resolution degrades to sentinel strings rather than failing a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    kind: ContextKind,
    /// Resolved client address, forwarded-for preferred
    pub ip: Option<String>,
    /// Raw user-agent header
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Context for a client request with an already-resolved address
    pub fn client(ip: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            kind: ContextKind::Client,
            ip,
            user_agent,
        }
    }

    /// Context for a system-originated action
    pub fn system() -> Self {
        Self {
            kind: ContextKind::System,
            ip: None,
            user_agent: None,
        }
    }

    /// Build from raw request parts. A non-empty forwarded-for value wins
    /// over the direct connection address.
    pub fn from_request(
        forwarded_for: Option<&str>,
        remote_addr: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        let forwarded = forwarded_for.map(str::trim).filter(|v| !v.is_empty());
        let remote = remote_addr.map(str::trim).filter(|v| !v.is_empty());
        Self::client(
            forwarded.or(remote).map(ToOwned::to_owned),
            user_agent
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToOwned::to_owned),
        )
    }

    /// IP as stored in an audit event. A client context without an
    /// address reads "Desconocida"; a system context reads "No disponible".
    pub fn resolved_ip(&self) -> String {
        match (&self.kind, &self.ip) {
            (_, Some(ip)) => ip.clone(),
            (ContextKind::Client, None) => IP_DESCONOCIDA.to_owned(),
            (ContextKind::System, None) => IP_NO_DISPONIBLE.to_owned(),
        }
    }

    /// User-agent as stored in an audit event
    pub fn resolved_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| AGENTE_DESCONOCIDO.to_owned())
    }
}
