//! Page objects for the authentication flows.
//!
//! Sign-in is a multi-step hosted dialog: email, continue, password,
//! continue. The dialog markup comes from the auth provider, so several
//! locators pin provider-generated class names; those are live-site fixtures,
//! not framework contract.

use std::time::Duration;

use gx_core::{Actions, By, Module, Result, Settings, build_module_url};
use tracing::info;

/// How long the dialog gets to close after submitting credentials.
const DIALOG_CLOSE_TIMEOUT: Duration = Duration::from_secs(15);

pub struct SignInPage {
    actions: Actions,
    pub sign_in_cta: By,
    pub dialog: By,
    pub email_input: By,
    pub password_input: By,
    pub continue_button: By,
    pub settings_cta: By,
    pub sign_out_cta: By,
    pub user_name_display: By,
}

impl SignInPage {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            sign_in_cta: By::XPath("//button[normalize-space()='Sign in']"),
            dialog: By::XPath("//div[contains(@class,'cl-card') and contains(@class,'cl-signIn-start')]"),
            email_input: By::XPath("//input[@id='identifier-field']"),
            password_input: By::XPath("//input[@id='password-field']"),
            continue_button: By::XPath(
                "//button[contains(@class,'cl-formButtonPrimary') and normalize-space()='Continue']",
            ),
            settings_cta: By::XPath("//button[normalize-space()='Settings']"),
            sign_out_cta: By::XPath("//button[normalize-space()='Sign Out']"),
            user_name_display: By::XPath(
                "//span[contains(@class,'cl-userPreviewMainIdentifierText')]",
            ),
        }
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Sign-in runs against the image module's entry page.
    pub async fn open(&self, settings: &Settings) -> Result<()> {
        let url = build_module_url(settings, Module::Image, &[])?;
        self.actions.goto(&url).await
    }

    /// Runs the full email/password flow and waits for the dialog to close.
    pub async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<()> {
        info!(email, "signing in");
        self.actions.click(&self.sign_in_cta).await?;
        self.actions.wait_until_visible(&self.dialog).await?;

        self.actions.type_text(&self.email_input, email).await?;
        self.actions.click(&self.continue_button).await?;

        self.actions.type_text(&self.password_input, password).await?;
        self.actions.click(&self.continue_button).await?;

        // The dialog may already be gone by the time we look; either way is
        // a successful submit.
        self.actions
            .wait_until_gone(&self.dialog, DIALOG_CLOSE_TIMEOUT)
            .await?;
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.actions.click(&self.settings_cta).await?;
        self.actions.click(&self.sign_out_cta).await
    }

    /// Whether the signed-in user menu is showing. False when the wait
    /// expires, an error only on session failure.
    pub async fn is_signed_in(&self) -> Result<bool> {
        self.actions.is_displayed(&self.user_name_display).await
    }

    pub async fn displayed_user_name(&self) -> Result<String> {
        self.actions.text(&self.user_name_display).await
    }
}

pub struct SignUpPage {
    actions: Actions,
    pub sign_up_cta: By,
    pub dialog: By,
    pub email_input: By,
    pub password_input: By,
    pub continue_button: By,
}

impl SignUpPage {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            sign_up_cta: By::XPath("//button[normalize-space()='Sign up']"),
            dialog: By::XPath("//div[contains(@class,'cl-card') and contains(@class,'cl-signUp-start')]"),
            email_input: By::XPath("//input[@id='emailAddress-field']"),
            password_input: By::XPath("//input[@id='password-field']"),
            continue_button: By::XPath(
                "//button[contains(@class,'cl-formButtonPrimary') and normalize-space()='Continue']",
            ),
        }
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    pub async fn open(&self, settings: &Settings) -> Result<()> {
        let url = build_module_url(settings, Module::Image, &[])?;
        self.actions.goto(&url).await
    }

    /// Opens the sign-up dialog and submits the first step. Email
    /// verification continues out-of-band, so the flow stops here.
    pub async fn begin_sign_up(&self, email: &str, password: &str) -> Result<()> {
        self.actions.click(&self.sign_up_cta).await?;
        self.actions.wait_until_visible(&self.dialog).await?;
        self.actions.type_text(&self.email_input, email).await?;
        self.actions.type_text(&self.password_input, password).await?;
        self.actions.click(&self.continue_button).await
    }
}
