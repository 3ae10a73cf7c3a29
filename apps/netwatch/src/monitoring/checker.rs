use std::io::ErrorKind;
use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use hickory_resolver::TokioResolver;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use surge_ping::{
    Client as PingClient, Config as PingConfig, PingIdentifier, PingSequence, SurgeError,
};

use super::types::ProbeOutcome;

/// Reachability probe seam; the scheduler only sees this trait.
#[async_trait::async_trait]
pub trait Pinger: Send + Sync {
    /// Probe `target` once, bounded by `timeout`.
    async fn probe(&self, target: &str, timeout: Duration) -> ProbeOutcome;

    /// Human-readable name for the dashboard; defaults to the target.
    async fn display_name(&self, target: &str) -> String {
        target.to_string()
    }
}

/// ICMP echo probing with DNS resolution for hostname targets.
pub struct IcmpPinger {
    client: PingClient,
    resolver: TokioResolver,
}

impl IcmpPinger {
    pub fn new() -> Result<Self> {
        let client = PingClient::new(&PingConfig::default()).context(
            "failed to open ICMP socket -- run as root or grant CAP_NET_RAW to the binary",
        )?;

        let resolver = TokioResolver::builder_with_config(
            ResolverConfig::cloudflare(),
            TokioConnectionProvider::default(),
        )
        .build();

        Ok(Self { client, resolver })
    }

    async fn resolve(&self, target: &str) -> Option<IpAddr> {
        if let Ok(ip) = target.parse::<IpAddr>() {
            return Some(ip);
        }
        let lookup = self.resolver.lookup_ip(target).await.ok()?;
        // The ping client speaks ICMPv4; prefer A records.
        lookup.iter().find(IpAddr::is_ipv4).or_else(|| lookup.iter().next())
    }
}

#[async_trait::async_trait]
impl Pinger for IcmpPinger {
    async fn probe(&self, target: &str, timeout: Duration) -> ProbeOutcome {
        let Some(ip) = self.resolve(target).await else {
            return ProbeOutcome::TransientError;
        };

        let payload = [0u8; 56];
        let mut pinger = self.client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &payload).await {
            Ok((_, rtt)) => ProbeOutcome::Success(rtt.as_secs_f64() * 1000.0),
            Err(SurgeError::Timeout { .. }) => ProbeOutcome::Timeout,
            Err(SurgeError::IOError(err)) if err.kind() == ErrorKind::PermissionDenied => {
                ProbeOutcome::PermissionDenied
            }
            Err(_) => ProbeOutcome::TransientError,
        }
    }

    async fn display_name(&self, target: &str) -> String {
        let Ok(ip) = target.parse::<IpAddr>() else {
            return target.to_string();
        };
        match self.resolver.reverse_lookup(ip).await {
            Ok(lookup) => lookup
                .iter()
                .next()
                .map(|name| name.to_utf8().trim_end_matches('.').to_string())
                .unwrap_or_else(|| target.to_string()),
            Err(_) => target.to_string(),
        }
    }
}
