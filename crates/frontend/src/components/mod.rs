mod login_form;
mod user_panel;

pub use login_form::LoginForm;
pub use user_panel::UserPanel;
