//! Email and password login form

use crate::auth::{login_error_message, use_auth};
use gallery_core::Credentials;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct LoginFormProps {
    /// Called after a successful login
    #[prop_or_default]
    pub on_success: Option<Callback<()>>,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let auth = use_auth();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let auth = auth.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        let on_success = props.on_success.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }

            let credentials = Credentials::new((*email).clone(), (*password).clone());
            let auth = auth.clone();
            let error = error.clone();
            let submitting = submitting.clone();
            let password = password.clone();
            let on_success = on_success.clone();

            submitting.set(true);
            error.set(None);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = auth.try_login(&credentials).await;
                submitting.set(false);
                match login_error_message(&outcome) {
                    Some(message) => {
                        password.set(String::new());
                        error.set(Some(message));
                    }
                    None => {
                        if let Some(on_success) = on_success {
                            on_success.emit(());
                        }
                    }
                }
            });
        })
    };

    html! {
        <form class="w-full max-w-sm space-y-4 bg-white rounded-lg shadow p-6" onsubmit={on_submit}>
            <h2 class="text-xl font-bold text-gray-900">{"Sign in"}</h2>

            if let Some(message) = &*error {
                <div class="p-3 bg-red-50 text-red-700 rounded text-sm">{message}</div>
            }

            <input
                type="email"
                class="w-full px-4 py-3 border border-gray-300 rounded-lg focus:outline-none focus:border-blue-400"
                placeholder="Email"
                autocomplete="username"
                value={(*email).clone()}
                oninput={on_email_input}
            />
            <input
                type="password"
                class="w-full px-4 py-3 border border-gray-300 rounded-lg focus:outline-none focus:border-blue-400"
                placeholder="Password"
                autocomplete="current-password"
                value={(*password).clone()}
                oninput={on_password_input}
            />
            <button
                type="submit"
                class="w-full bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400 text-white font-medium py-3 px-4 rounded-lg transition-colors"
                disabled={*submitting || email.is_empty() || password.is_empty()}
            >
                if *submitting {
                    {"Signing in..."}
                } else {
                    {"Sign in"}
                }
            </button>
        </form>
    }
}
