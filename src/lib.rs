use log::{debug, info};
use rand_distr::{Distribution, Uniform};
use std::collections::HashSet;
use std::fmt;

pub mod config;
pub mod controller;
pub mod planner;
pub mod utils;

pub use controller::{run_spin, Landing, Presenter, SpinCompletion, SpinController, SpinStatus, SpinTicket};
pub use planner::SpinPlan;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Topic {
    pub name: String,
    #[serde(default)]
    pub removed: bool,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            removed: false,
        }
    }
}

// Error type shared by the registry, planner and spin controller
#[derive(Debug, Clone, PartialEq)]
pub enum WheelError {
    InvalidArgument(String),
    NotFound(String),
    AllTopicsExhausted,
    SpinInProgress,
    /// A completion arrived for a spin that is not (or no longer) in flight
    NoSpinInFlight,
    DuplicateTopic(String),
    EmptyTopicName,
    Config(String),
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            WheelError::NotFound(name) => write!(f, "No active topic named '{}'", name),
            WheelError::AllTopicsExhausted => write!(f, "All topics have been selected"),
            WheelError::SpinInProgress => write!(f, "A spin is already in progress"),
            WheelError::NoSpinInFlight => write!(f, "No matching spin is in flight"),
            WheelError::DuplicateTopic(name) => write!(f, "Duplicate topic name '{}'", name),
            WheelError::EmptyTopicName => write!(f, "Topic names cannot be empty"),
            WheelError::Config(msg) => write!(f, "Invalid topic configuration: {}", msg),
        }
    }
}

impl std::error::Error for WheelError {}

/// Ordered topic list with removal flags.
///
/// Order is significant: it is the slice order on the wheel and the row order
/// in the legend. Topics are never deleted, only flagged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicRegistry {
    topics: Vec<Topic>,
}

impl TopicRegistry {
    /// Build a registry from names, rejecting empty and duplicate entries.
    pub fn from_names<I, S>(names: I) -> Result<Self, WheelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut topics = Vec::new();

        for name in names {
            let name: String = name.into();
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(WheelError::EmptyTopicName);
            }
            if !seen.insert(name.clone()) {
                return Err(WheelError::DuplicateTopic(name));
            }
            topics.push(Topic::new(name));
        }

        Ok(Self { topics })
    }

    /// Topics still eligible for selection, in insertion order.
    pub fn active(&self) -> Vec<&Topic> {
        self.topics.iter().filter(|t| !t.removed).collect()
    }

    pub fn active_count(&self) -> usize {
        self.topics.iter().filter(|t| !t.removed).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.active_count() == 0
    }

    /// Every topic, removed or not.
    pub fn all(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Flag an active topic as removed.
    ///
    /// Unknown names and topics that were already removed leave the registry
    /// untouched and report `NotFound`.
    pub fn mark_removed(&mut self, name: &str) -> Result<(), WheelError> {
        match self.topics.iter_mut().find(|t| t.name == name && !t.removed) {
            Some(topic) => {
                topic.removed = true;
                debug!("Marked topic '{}' as removed", name);
                Ok(())
            }
            None => Err(WheelError::NotFound(name.to_string())),
        }
    }
}

/// Names in the order they were picked. Append-only for the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionHistory {
    names: Vec<String>,
}

impl SelectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Pick a uniformly distributed index in `[0, n)`.
pub fn choose_index<R: rand::Rng + ?Sized>(rng: &mut R, n: usize) -> Result<usize, WheelError> {
    let dist = Uniform::new(0, n).map_err(|_| {
        WheelError::InvalidArgument(format!("cannot choose among {} candidates", n))
    })?;
    Ok(dist.sample(rng))
}

#[derive(Debug, serde::Deserialize)]
struct TopicRecord {
    name: String,
}

/// Load the topic registry from CSV content with a `name` header column.
pub fn read_topics_from_csv_string(csv_content: &str) -> Result<TopicRegistry, WheelError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let mut names = Vec::new();
    for (i, record) in reader.deserialize::<TopicRecord>().enumerate() {
        let record = record.map_err(|e| WheelError::Config(format!("row {}: {}", i + 1, e)))?;
        names.push(record.name);
    }

    let registry = TopicRegistry::from_names(names)?;
    info!("Successfully loaded {} topics from CSV content", registry.len());
    Ok(registry)
}
