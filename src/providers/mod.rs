pub mod weather_provider;
pub mod directions_provider;
pub mod openweather;
pub mod google_directions;

pub use weather_provider::{ Coordinates, CurrentConditions, WeatherProvider };
pub use directions_provider::{
    DirectionsProvider,
    DirectionsRequest,
    Route,
    RouteLeg,
    RouteStep,
};
pub use openweather::OpenWeatherClient;
pub use google_directions::GoogleDirectionsClient;
