//! `createuser` / `createsuperuser` - create accounts from the command line.
//!
//! Unlike the account manager, these commands face people, so they check the
//! email format and the password strength before handing over.

use validator::Validate;

use common::{AppError, AppResult};
use domain::{ExtraFields, PasswordPolicy, User, UserAttributes};

use crate::cli::{AccountKind, CreateAccountArgs};
use crate::service::AccountService;

#[derive(Debug, Validate)]
struct EmailInput {
    #[validate(email(message = "Enter a valid email address."))]
    email: String,
}

/// Validate the arguments and create the account.
pub async fn execute(
    args: CreateAccountArgs,
    kind: AccountKind,
    service: &dyn AccountService,
    policy: &PasswordPolicy,
) -> AppResult<User> {
    EmailInput {
        email: args.email.clone(),
    }
    .validate()
    .map_err(|e| AppError::bad_request(e.to_string()))?;

    let password = match (args.password.as_deref(), args.no_password) {
        (_, true) => None,
        (Some(password), false) => Some(password),
        (None, false) => {
            return Err(AppError::bad_request(
                "A password is required: pass --password, set ACCOUNT_PASSWORD, or use --no-password",
            ))
        }
    };

    if let Some(password) = password {
        if !args.skip_password_validation {
            let attributes =
                UserAttributes::new(&args.email).with_names(&args.first_name, &args.last_name);
            policy.validate(password, Some(&attributes))?;
        }
    }

    let extra = ExtraFields::new()
        .first_name(args.first_name.as_str())
        .last_name(args.last_name.as_str());

    let user = match kind {
        AccountKind::Regular => service.create_user(Some(&args.email), password, extra).await?,
        AccountKind::Superuser => {
            service
                .create_superuser(Some(&args.email), password, extra)
                .await?
        }
    };

    match kind {
        AccountKind::Regular => println!("User {} created successfully.", user),
        AccountKind::Superuser => println!("Superuser {} created successfully.", user),
    }

    Ok(user)
}
