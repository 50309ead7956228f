//! Static session info shown at the top of every frame

/// Dev server details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeInfo {
    pub port: u16,
    pub ips: Vec<String>,
    pub start_time_ms: u64,
}

impl ServeInfo {
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    pub fn network_urls(&self) -> impl Iterator<Item = String> + '_ {
        self.ips
            .iter()
            .map(move |ip| format!("http://{}:{}", ip, self.port))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub dest: String,
}

/// Exactly one mode per session, or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Serve(ServeInfo),
    Build(BuildInfo),
    Headless,
}

impl SessionMode {
    pub fn is_serve(&self) -> bool {
        matches!(self, Self::Serve(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub title: String,
    pub mode: SessionMode,
}

impl SessionInfo {
    pub fn new(title: impl Into<String>, mode: SessionMode) -> Self {
        Self {
            title: title.into(),
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let serve = ServeInfo {
            port: 8080,
            ips: vec!["192.168.1.2".into(), "10.0.0.1".into()],
            start_time_ms: 12,
        };
        assert_eq!(serve.local_url(), "http://localhost:8080");
        assert_eq!(
            serve.network_urls().collect::<Vec<_>>(),
            vec!["http://192.168.1.2:8080", "http://10.0.0.1:8080"]
        );
    }
}
