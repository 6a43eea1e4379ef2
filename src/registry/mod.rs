mod core;

pub use self::core::ScenarioRegistry;
