//! Signed-in user summary with a logout button

use crate::auth::{use_auth, use_current_user};
use yew::prelude::*;

#[function_component(UserPanel)]
pub fn user_panel() -> Html {
    let auth = use_auth();
    let Some(user) = use_current_user() else {
        return html! {};
    };

    let on_logout = Callback::from(move |_: MouseEvent| auth.logout());

    let display_name = if user.full_name.is_empty() {
        user.email.clone()
    } else {
        user.full_name.clone()
    };

    html! {
        <div class="flex items-center justify-between p-4 bg-white rounded-lg shadow">
            <div>
                <p class="font-medium text-gray-900">{display_name}</p>
                <p class="text-sm text-gray-500">{&user.email}</p>
            </div>
            <button
                class="px-4 py-2 bg-gray-100 hover:bg-gray-200 text-gray-800 rounded-lg"
                onclick={on_logout}
            >
                {"Log out"}
            </button>
        </div>
    }
}
