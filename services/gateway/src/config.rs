use anyhow::{Context, anyhow};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use swipe_session::{MatchPolicy, SessionConfig, StaticCandidateSource};

/// Gateway settings, read from the environment (and `.env` if present)
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub session: SessionConfig,
    /// How often idle rooms are checked for expiry
    pub sweep_interval: Duration,
    /// JSON array of candidates; the demo list is used when unset
    pub candidates_file: Option<PathBuf>,
    /// Inbound frame burst allowed per socket
    pub frame_burst: u32,
    /// Inbound frames per second refilled per socket
    pub frame_rate: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3500)),
            session: SessionConfig::default(),
            sweep_interval: Duration::from_secs(30),
            candidates_file: None,
            frame_burst: 50,
            frame_rate: 20.0,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let idle_grace_secs: u64 = parse_or(&lookup, "ROOM_IDLE_GRACE_SECS", defaults.session.idle_grace.as_secs())?;
        let retention_secs: u64 = parse_or(
            &lookup,
            "ROOM_CLOSED_RETENTION_SECS",
            defaults.session.closed_retention.as_secs(),
        )?;
        let sweep_secs: u64 = parse_or(&lookup, "ROOM_SWEEP_INTERVAL_SECS", defaults.sweep_interval.as_secs())?;
        if sweep_secs == 0 {
            return Err(anyhow!("ROOM_SWEEP_INTERVAL_SECS must be at least 1"));
        }

        let match_policy = MatchPolicy {
            reevaluate_on_leave: parse_or(
                &lookup,
                "MATCH_REEVALUATE_ON_LEAVE",
                defaults.session.match_policy.reevaluate_on_leave,
            )?,
            min_participants: parse_or(
                &lookup,
                "MATCH_MIN_PARTICIPANTS",
                defaults.session.match_policy.min_participants,
            )?,
        };

        Ok(Self {
            bind_addr: parse_or(&lookup, "GATEWAY_BIND_ADDR", defaults.bind_addr)?,
            session: SessionConfig {
                idle_grace: Duration::from_secs(idle_grace_secs),
                closed_retention: Duration::from_secs(retention_secs),
                match_policy,
            },
            sweep_interval: Duration::from_secs(sweep_secs),
            candidates_file: lookup("CANDIDATES_FILE").map(PathBuf::from),
            frame_burst: parse_or(&lookup, "WS_FRAME_BURST", defaults.frame_burst)?,
            frame_rate: parse_or(&lookup, "WS_FRAME_RATE", defaults.frame_rate)?,
        })
    }

    /// Load the candidate list every new room starts from
    pub fn candidate_source(&self) -> anyhow::Result<StaticCandidateSource> {
        match &self.candidates_file {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                StaticCandidateSource::from_json(&json)
                    .with_context(|| format!("parsing {}", path.display()))
            }
            None => Ok(StaticCandidateSource::demo()),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
