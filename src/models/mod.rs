pub mod creative;
pub mod defaults;
pub mod loaders;
pub mod persona;
pub mod report;

pub use creative::CreativeImage;
pub use defaults::{default_personas, DEFAULT_PITCH};
pub use loaders::{load_persona_dir, load_persona_file, parse_persona_json};
pub use persona::{PersonaDefinition, PersonaDraft, PersonaRoster};
pub use report::{
    CreativeAnalysis, CreativeComparisonReport, FeatureSentiment, FocusGroupReport,
    PersonaPreference, PersonaVerdict, PreferredCreative, Verdict, VerdictCounts,
};
