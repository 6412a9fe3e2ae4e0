pub mod persona_loader;

pub use persona_loader::{load_persona_dir, load_persona_file, parse_persona_json, parse_persona_toml};
