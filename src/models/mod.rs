pub mod category;
pub mod patch;
pub mod service;
pub mod subscription;

pub use category::{Category, CreateCategoryDto};
pub use patch::Patch;
pub use service::{CreateServiceDto, Service};
pub use subscription::{
    format_amount, CreateSubscriptionDto, Subscription, SubscriptionView, UpdateSubscriptionDto,
};
