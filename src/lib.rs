/*!
config-topology

Turns plaintext network-device configuration dumps into a structured device
model and an inferred topology graph.

Pipeline: raw text → classifier → role-specific extractor → `Device`;
a collection of devices → inference engine → `TopologyGraph`. Links are
inferred from shared IP subnets first, then from hostname mentions in
interface descriptions.

Downstream consumers (validation, visualization, documentation export) read
the model and the graph through this crate's public API; none of them live
here.
*/

pub mod classifier;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod topology;

pub use classifier::{Classifier, ClassifierConfig};
pub use model::device::{Device, DeviceRole, Router, Switch};
pub use parsers::ExtractionError;
pub use pipeline::{AnalysisReport, AnalyzeError, ConfigSource, analyze};
pub use topology::{LinkInfo, TopologyGraph, infer};
