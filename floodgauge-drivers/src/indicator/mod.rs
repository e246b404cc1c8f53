//! Hazard indicator lamps

mod traffic_light;

pub use traffic_light::TrafficLight;
