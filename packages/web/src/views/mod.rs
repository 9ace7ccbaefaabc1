mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod forgot_password;
pub use forgot_password::ForgotPassword;

mod dashboard;
pub use dashboard::Dashboard;

mod settings;
pub use settings::Settings;

mod viewer;
pub use viewer::Viewer;
