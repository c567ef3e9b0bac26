use std::fmt;

pub const DEFAULT_REGISTRY: &str = "docker.io";
const OFFICIAL_NAMESPACE: &str = "library/";
const DOCKER_SCHEME: &str = "docker:";

/// Transports whose references are handed to the inspector untouched.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Transport {
    ContainersStorage,
    Dir,
    DockerArchive,
    DockerDaemon,
    Oci,
    OciArchive,
}

impl Transport {
    pub const ALL: [Transport; 6] = [
        Transport::ContainersStorage,
        Transport::Dir,
        Transport::DockerArchive,
        Transport::DockerDaemon,
        Transport::Oci,
        Transport::OciArchive,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            Transport::ContainersStorage => "containers-storage:",
            Transport::Dir => "dir:",
            Transport::DockerArchive => "docker-archive:",
            Transport::DockerDaemon => "docker-daemon:",
            Transport::Oci => "oci:",
            Transport::OciArchive => "oci-archive:",
        }
    }

    pub fn detect(raw: &str) -> Option<Transport> {
        Transport::ALL
            .iter()
            .copied()
            .find(|t| raw.starts_with(t.prefix()))
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A reference in the canonical form the inspector is given.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn new(raw: impl AsRef<str>) -> ImageReference {
        ImageReference(normalize(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn transport(&self) -> Option<Transport> {
        Transport::detect(&self.0)
    }

    pub fn is_registry(&self) -> bool {
        self.transport().is_none()
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// The pieces of `docker:<body>` split the way a generic url parser would.
#[derive(Debug, Default, PartialEq, Eq)]
struct UrlParts<'a> {
    netloc: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    fn split(body: &'a str) -> UrlParts<'a> {
        let mut parts = UrlParts::default();
        let mut rest = body;

        if let Some(after) = rest.strip_prefix("//") {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            parts.netloc = &after[..end];
            rest = &after[end..];
        }

        if let Some((before, fragment)) = rest.split_once('#') {
            parts.fragment = Some(fragment);
            rest = before;
        }
        if let Some((before, query)) = rest.split_once('?') {
            parts.query = Some(query);
            rest = before;
        }
        parts.path = rest;
        parts
    }
}

/// Rewrites a user supplied image reference into `docker://<host>/<repository>[:<tag>]`.
///
/// References using one of the opaque [`Transport`]s are returned as given.
/// A bare `a/b` is always read as `<namespace>/<repository>` on `docker.io`;
/// the first segment only becomes the host once there are at least two slashes.
pub fn normalize(raw: &str) -> String {
    if Transport::detect(raw).is_some() {
        return raw.to_string();
    }

    let stripped = raw.strip_prefix(DOCKER_SCHEME).unwrap_or(raw);
    let body = if !stripped.starts_with("//") && stripped.matches('/').count() > 1 {
        format!("//{}", stripped)
    } else {
        stripped.to_string()
    };

    let parts = UrlParts::split(&body);
    let netloc = if parts.netloc.is_empty() {
        DEFAULT_REGISTRY
    } else {
        parts.netloc
    };

    let (path, tag) = match parts.path.split_once(':') {
        Some((path, tag)) => (path, tag),
        None => (parts.path, ""),
    };
    let path = path.strip_prefix('/').unwrap_or(path);

    let path = if netloc == DEFAULT_REGISTRY && !path.contains('/') {
        format!("{}{}", OFFICIAL_NAMESPACE, path)
    } else {
        path.to_string()
    };

    let mut canonical = format!("{}//{}", DOCKER_SCHEME, netloc);
    if !path.is_empty() && !path.starts_with('/') {
        canonical.push('/');
    }
    canonical.push_str(&path);
    if let Some(query) = parts.query.filter(|q| !q.is_empty()) {
        canonical.push('?');
        canonical.push_str(query);
    }
    if let Some(fragment) = parts.fragment.filter(|f| !f.is_empty()) {
        canonical.push('#');
        canonical.push_str(fragment);
    }
    if !tag.is_empty() {
        canonical.push(':');
        canonical.push_str(tag);
    }

    tracing::debug!("Normalized image reference {:?} to {:?}", raw, canonical);
    canonical
}
