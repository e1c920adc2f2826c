pub mod assistants;
pub mod client;
pub mod image;
pub mod types;

pub use assistants::OpenAiAssistantsClient;
pub use client::OpenAiHttpClient;
pub use image::OpenAiImageClient;
