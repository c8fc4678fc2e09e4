//! Authentication guard for signed-in-only content

use crate::auth::use_auth;
use crate::components::LoginForm;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    pub children: Children,
}

/// Shows the login form until someone is signed in, then the children
#[function_component(RequireAuth)]
pub fn require_auth(props: &RequireAuthProps) -> Html {
    let auth = use_auth();

    if auth.is_authenticated() {
        return html! { <>{ props.children.clone() }</> };
    }

    html! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center">
            <LoginForm />
        </div>
    }
}
