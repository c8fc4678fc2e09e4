use crate::auth::{AuthProvider, RequireAuth, use_current_user};
use crate::components::UserPanel;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <AuthProvider>
            <RequireAuth>
                <Gallery />
            </RequireAuth>
        </AuthProvider>
    }
}

#[function_component(Gallery)]
fn gallery() -> Html {
    let first_name = use_current_user()
        .map(|user| user.first_name)
        .filter(|name| !name.is_empty());

    html! {
        <div class="max-w-3xl mx-auto p-6 space-y-6">
            <UserPanel />
            <h1 class="text-2xl font-bold text-gray-900">
                {
                    match first_name {
                        Some(name) => format!("Welcome back, {name}"),
                        None => "Welcome back".to_string(),
                    }
                }
            </h1>
        </div>
    }
}
