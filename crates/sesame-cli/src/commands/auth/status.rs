//! Status command implementation.

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, ValueEnum};

use sesame_app::{AuthProvider, CacheKey, MemoryNavigator, Navigator, Render, Route};

use crate::output;
use crate::session::Context;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StartRoute {
    Login,
    Register,
    Home,
    Users,
}

impl From<StartRoute> for Route {
    fn from(route: StartRoute) -> Self {
        match route {
            StartRoute::Login => Route::Login,
            StartRoute::Register => Route::Register,
            StartRoute::Home => Route::Home,
            StartRoute::Users => Route::Users,
        }
    }
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Route the application starts on
    #[arg(long, value_enum, default_value = "home")]
    pub route: StartRoute,
}

pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let navigator = Arc::new(MemoryNavigator::new(args.route.into()));
    let provider = AuthProvider::new(ctx.auth()?, navigator.clone());

    let outcome = provider.start().await;
    let state = provider.auth();

    output::field("Phase", &outcome.phase.to_string());
    if let Some(user) = &state.user {
        output::field("User", &format!("{} <{}>", user.name, user.email));
    }
    let screen = match outcome.render {
        Render::Loading => "loading".to_string(),
        Render::Nothing => "nothing".to_string(),
        Render::Screen(route) => route.to_string(),
    };
    output::field("Render", &screen);
    output::field("Route", &navigator.current().to_string());
    for route in navigator.replacements() {
        output::field("Redirect", &route.to_string());
    }

    // A session read that failed leaves the guard unauthenticated.
    if let Some(error) = provider.view_model().cache().state::<bool>(CacheKey::Session).error {
        output::error(&error);
    }

    Ok(())
}
