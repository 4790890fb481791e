use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{HomeView, PlanView, PlansView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/plans", PlansView)] Plans {},
        #[route("/plans/:plan_id", PlanView)] Plan { plan_id: u64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "StudyPath" }
            ul {
                li { Link { to: Route::Home {}, "Planner" } }
                li { Link { to: Route::Plans {}, "Saved plans" } }
            }
        }
    }
}
