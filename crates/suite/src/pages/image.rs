//! Page object for the AI Image Generator module.

use std::path::Path;
use std::time::Duration;

use gx_core::{Actions, By, Module, Result, Settings, build_module_url};
use tracing::info;

/// Extra window for the upload dialog to finish its own network work.
const DIALOG_TIMEOUT: Duration = Duration::from_secs(45);

/// Locators and actions for the image generation interface.
///
/// The locator fields are public so a test can drive an odd interaction
/// directly through [`ImageGeneratorPage::actions`] when no high-level
/// method fits.
pub struct ImageGeneratorPage {
    actions: Actions,
    pub heading: By,
    pub prompt_label: By,
    pub prompt: By,
    pub char_counter: By,
    pub improve_prompt_cta: By,
    pub prompt_from_image_cta: By,
    pub dialog: By,
    pub dialog_file_input: By,
    pub generated_prompt_option: By,
    pub validation_message: By,
    pub model_dropdown: By,
    pub model_search_input: By,
    pub no_model_match: By,
    pub aspect_ratio_dropdown: By,
    pub resolution_dropdown: By,
    pub image_count_dropdown: By,
    pub generate_button: By,
    pub generated_images: By,
    pub right_panel_placeholder: By,
    pub right_panel_spinner: By,
    pub uploaded_image_tile: By,
}

impl ImageGeneratorPage {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            heading: By::XPath("//h1[normalize-space()='AI Image Generator']"),
            prompt_label: By::XPath("//label[@for='prompt']"),
            prompt: By::XPath("//textarea[@id='prompt']"),
            char_counter: By::XPath("//p[normalize-space()='0/3500']"),
            improve_prompt_cta: By::XPath("//button[normalize-space()='Improve prompt']"),
            prompt_from_image_cta: By::XPath(
                "//button[normalize-space()='Generate prompt from image']",
            ),
            dialog: By::XPath("//div[@role='dialog']"),
            dialog_file_input: By::XPath("//div[@role='dialog']//input[@type='file']"),
            generated_prompt_option: By::XPath(
                "//div[@aria-label='Select enhanced prompt option 1']",
            ),
            validation_message: By::XPath("//p[normalize-space()='Image description is required']"),
            model_dropdown: By::XPath(
                "//div[@class='flex min-w-0 flex-1 items-center']\
                 //div[@class='flex min-w-0 flex-1 items-center']",
            ),
            model_search_input: By::XPath("//input[@placeholder='Search models...']"),
            no_model_match: By::XPath(
                "//div[normalize-space()='No models found matching your filters.']",
            ),
            aspect_ratio_dropdown: By::XPath("(//button[@role='combobox'])[1]"),
            resolution_dropdown: By::XPath("(//button[@role='combobox'])[2]"),
            image_count_dropdown: By::XPath("(//button[@role='combobox'])[4]"),
            generate_button: By::XPath(
                "//button[normalize-space()='Generate' or contains(@class,'generate')]",
            ),
            generated_images: By::XPath(
                "//div[contains(@class,'grid') and contains(@class,'grid-cols')]\
                 //img[contains(@alt,'Generated design')]",
            ),
            right_panel_placeholder: By::XPath(
                "//h2[normalize-space()='Your creations will appear here']",
            ),
            right_panel_spinner: By::XPath("//*[name()='svg' and contains(@class,'animate-spin')]"),
            uploaded_image_tile: By::XPath(
                "//div[contains(@class,'absolute') and .//button[normalize-space()='Remove']]",
            ),
        }
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Navigates to the image generator, optionally preselecting a model via
    /// the `model` query parameter.
    pub async fn open(&self, settings: &Settings, model: Option<&str>) -> Result<()> {
        let url = match model {
            Some(model) => build_module_url(settings, Module::Image, &[("model", model)])?,
            None => build_module_url(settings, Module::Image, &[])?,
        };
        info!(%url, "opening image generator");
        self.actions.goto(&url).await
    }

    pub async fn heading_text(&self) -> Result<String> {
        self.actions.text(&self.heading).await
    }

    pub async fn enter_prompt(&self, text: &str) -> Result<()> {
        self.actions.type_text(&self.prompt, text).await
    }

    /// Sets the prompt through the native value setter. Needed for large
    /// inputs where per-key typing is slow and can drop characters.
    pub async fn enter_prompt_via_script(&self, text: &str) -> Result<()> {
        self.actions.type_via_script(&self.prompt, text).await
    }

    pub async fn clear_prompt(&self) -> Result<()> {
        self.actions.clear_via_keyboard(&self.prompt).await
    }

    pub async fn prompt_value(&self) -> Result<String> {
        self.actions.value(&self.prompt).await
    }

    /// The field's `maxlength`, when the application declares one.
    pub async fn prompt_max_length(&self) -> Result<Option<u32>> {
        Ok(self
            .actions
            .attr(&self.prompt, "maxlength")
            .await?
            .and_then(|raw| raw.trim().parse().ok()))
    }

    pub async fn click_generate(&self) -> Result<()> {
        self.actions.click(&self.generate_button).await
    }

    pub async fn validation_text(&self) -> Result<String> {
        self.actions.text(&self.validation_message).await
    }

    /// Waits until the prompt field carries any non-blank value, e.g. after
    /// prompt-from-image generation. Returns whether it happened in time.
    pub async fn wait_for_prompt_generated(&self, timeout: Duration) -> Result<bool> {
        self.actions
            .wait_for_value(&self.prompt, timeout, |value| !value.trim().is_empty())
            .await
    }

    /// Waits until the prompt differs from `original`, e.g. after the
    /// improve-prompt action rewrites it.
    pub async fn wait_for_prompt_changed(&self, original: &str, timeout: Duration) -> Result<bool> {
        self.actions
            .wait_for_value(&self.prompt, timeout, |value| value != original)
            .await
    }

    /// Opens the model picker, searches, and selects the named model.
    pub async fn select_model_via_search(&self, model_name: &str) -> Result<()> {
        self.actions.click(&self.model_dropdown).await?;
        self.actions
            .type_text(&self.model_search_input, model_name)
            .await?;
        let option = By::XPath(format!(
            "//span[@class='font-medium' and contains(text(),'{model_name}')]"
        ));
        self.actions.click(&option).await
    }

    /// Uploads a reference image through the prompt-from-image dialog. The
    /// file input inside the dialog is hidden, so presence is enough.
    pub async fn upload_reference_image(&self, path: &Path) -> Result<()> {
        self.actions.click(&self.prompt_from_image_cta).await?;
        let dialog_actions = self.actions.with_timeout(DIALOG_TIMEOUT);
        dialog_actions.wait_until_present(&self.dialog).await?;
        dialog_actions
            .upload_file(&self.dialog_file_input, path)
            .await
    }

    pub async fn generated_image_count(&self) -> Result<usize> {
        self.actions.element_count(&self.generated_images).await
    }

    pub async fn placeholder_displayed(&self) -> Result<bool> {
        self.actions.is_displayed(&self.right_panel_placeholder).await
    }
}
