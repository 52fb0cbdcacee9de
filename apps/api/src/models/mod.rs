pub mod article;
pub mod category;
pub mod image;
pub mod publish;
