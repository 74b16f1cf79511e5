use shared::{
    domain::{Role, UserProfile},
    protocol::{LoginRequest, ProviderSignupRequest},
};
use tracing::{info, warn};

use crate::{
    error::FlowError, identity::IdentityProvider, navigation::Route, ClientEvent, CourseClient,
    Notice, ProfilePhase,
};

pub const MISSING_FIELDS: &str = "Please fill all fields";
pub const LOGIN_FAILED: &str = "Login failed";
pub const PROVIDER_LOGIN_FAILED: &str = "Google login failed";
pub const LOGIN_SUCCEEDED: &str = "Login Successfully";

impl CourseClient {
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, FlowError> {
        let _busy = self.begin(&self.login_busy)?;
        let origin = self.navigator.current();

        let outcome: Result<UserProfile, FlowError> = async {
            if email.is_empty() || password.is_empty() {
                return Err(FlowError::validation(MISSING_FIELDS));
            }
            let partial = self
                .api
                .login(&LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
                .map_err(|err| FlowError::remote(err, LOGIN_FAILED))?;
            Ok(self.merge_profile(partial).await)
        }
        .await;

        self.finish_sign_in(&origin, outcome)
    }

    pub async fn login_with_provider(
        &self,
        provider: &dyn IdentityProvider,
    ) -> Result<UserProfile, FlowError> {
        let _busy = self.begin(&self.login_busy)?;
        let origin = self.navigator.current();

        let outcome: Result<UserProfile, FlowError> = async {
            let identity = provider
                .sign_in()
                .await
                .map_err(|err| FlowError::identity_provider(err, PROVIDER_LOGIN_FAILED))?;
            let partial = self
                .api
                .provider_signup(&ProviderSignupRequest {
                    name: identity.name,
                    email: identity.email,
                    role: Role::Unset,
                })
                .await
                .map_err(|err| FlowError::remote(err, PROVIDER_LOGIN_FAILED))?;
            Ok(self.merge_profile(partial).await)
        }
        .await;

        self.finish_sign_in(&origin, outcome)
    }

    pub fn logout(&self) {
        self.users.reset();
        info!("auth: signed out");
        self.emit(ClientEvent::SignedOut);
    }

    /// Applies the auth endpoint's answer, then overwrites it with the current-user fetch.
    async fn merge_profile(&self, partial: UserProfile) -> UserProfile {
        self.apply_profile(partial, ProfilePhase::Partial);
        match self.api.current_user().await {
            Ok(complete) => self.apply_profile(complete, ProfilePhase::Complete),
            // The partial profile is already usable; the next fetch completes it.
            Err(err) => warn!("auth: current user fetch failed, keeping login payload: {err}"),
        }
        self.users.snapshot()
    }

    fn apply_profile(&self, profile: UserProfile, phase: ProfilePhase) {
        info!(
            "auth: applying {phase:?} profile user_id={} enrolled_courses={}",
            profile.id,
            profile.enrolled_courses.len()
        );
        self.users.replace(profile.clone());
        self.emit(ClientEvent::ProfileApplied { phase, profile });
    }

    fn finish_sign_in(
        &self,
        origin: &Route,
        outcome: Result<UserProfile, FlowError>,
    ) -> Result<UserProfile, FlowError> {
        match outcome {
            Ok(profile) => {
                self.redirect(origin, Route::Landing);
                self.notify(Notice::success(LOGIN_SUCCEEDED));
                Ok(profile)
            }
            Err(err) => {
                self.notify(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }
}
