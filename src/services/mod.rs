// Browser core services
// Services talk to the outside world: the focus backend, the settings file, timers.

pub mod focus_client;
pub mod poller;
pub mod settings_engine;
