mod home;
mod plan;
mod planner;
mod plans;
mod roadmap;
mod state;

#[cfg(test)]
pub(crate) mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use plan::PlanView;
pub use plans::PlansView;
pub use state::{ViewError, ViewState, view_state_from_resource};
