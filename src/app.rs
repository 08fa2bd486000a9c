mod app_events;
mod app_render;
mod app_state;

#[cfg(test)]
mod app_render_tests;

// Re-export public types
pub use app_state::App;
