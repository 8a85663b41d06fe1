// Discord commands module.
// Each feature gets its own command file.

pub mod artist;

pub mod avatar;

pub mod boards;

pub mod dictionary;

pub mod timezones;

pub mod uptime;
