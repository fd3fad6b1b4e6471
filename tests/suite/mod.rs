mod app_flow;
mod benchmark;
mod preview;
mod resonance;
mod session;
