/// Signup, login, and profile handlers
use super::envelope::{self, invalid_method};
use crate::{
    accounts::{NewUser, ProfileUpdate},
    context::AppContext,
    error::{ClinicError, ClinicResult},
    uploads,
};
use axum::{
    extract::{Multipart, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/signup", post(signup).fallback(invalid_method))
        .route("/login", post(login).fallback(invalid_method))
        .route("/user-profile", get(user_profile))
        .route(
            "/update-profile",
            post(update_profile).fallback(invalid_method),
        )
}

/// Fields collected from the signup or profile multipart form.
#[derive(Default)]
struct ProfileForm {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    password_confirm: Option<String>,
    age: Option<String>,
    blood_group: Option<String>,
    gender: Option<String>,
    profile_pic: Option<(String, Vec<u8>)>,
}

async fn read_profile_form(mut multipart: Multipart) -> ClinicResult<ProfileForm> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ClinicError::Validation(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "profilePic" => {
                let filename = field.file_name().unwrap_or("profile.png").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ClinicError::Validation(format!("Upload failed: {}", e)))?;
                if !bytes.is_empty() {
                    form.profile_pic = Some((filename, bytes.to_vec()));
                }
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ClinicError::Validation(format!("Malformed form data: {}", e)))?;
                let value = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                };
                match other {
                    "name" => form.name = value,
                    "email" => form.email = value,
                    "password" => form.password = value,
                    "passwordConfirm" => form.password_confirm = value,
                    "age" => form.age = value,
                    "bloodGroup" => form.blood_group = value,
                    "gender" => form.gender = value,
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

async fn signup(State(ctx): State<AppContext>, multipart: Multipart) -> Json<Value> {
    envelope::respond(signup_inner(ctx, multipart).await)
}

async fn signup_inner(ctx: AppContext, multipart: Multipart) -> ClinicResult<Json<Value>> {
    let form = read_profile_form(multipart).await?;

    let (Some(name), Some(email), Some(password), Some(password_confirm)) = (
        form.name,
        form.email,
        form.password,
        form.password_confirm,
    ) else {
        return Err(ClinicError::Validation(
            "All fields are required".to_string(),
        ));
    };

    if password != password_confirm {
        return Err(ClinicError::Validation(
            "Passwords do not match".to_string(),
        ));
    }

    let profile_pic = match form.profile_pic {
        Some((filename, bytes)) => {
            Some(uploads::save_upload(&ctx.config.uploads.directory, &filename, &bytes).await?)
        }
        None => None,
    };

    let user = ctx
        .users
        .create(NewUser {
            name,
            email,
            password: password.clone(),
            age: form.age.and_then(|a| a.parse().ok()),
            blood_type: form.blood_group,
            gender: form.gender,
            profile_pic,
        })
        .await?;

    // Welcome mail is best-effort; a transport failure never fails signup.
    if let Err(e) = ctx
        .mailer
        .send_welcome(&user.email, &user.name, &password)
        .await
    {
        tracing::warn!("Welcome mail to {} failed: {}", user.email, e);
    }

    Ok(envelope::success("Registration successful!"))
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(rename = "type")]
    login_type: Option<String>,
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

async fn login(State(ctx): State<AppContext>, Json(req): Json<LoginRequest>) -> Json<Value> {
    envelope::respond(login_inner(ctx, req).await)
}

async fn login_inner(ctx: AppContext, req: LoginRequest) -> ClinicResult<Json<Value>> {
    if req.login_type.as_deref() == Some("admin") {
        let (Some(username), Some(password)) = (req.username, req.password) else {
            return Err(ClinicError::Validation(
                "Username and password required".to_string(),
            ));
        };

        let admin = ctx.admins.login(&username, &password).await?;
        return Ok(Json(json!({
            "status": "success",
            "message": "Admin login successful",
            "role": "admin",
            "user": {"name": admin.username}
        })));
    }

    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(ClinicError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let user = ctx.users.login(&email, &password).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Login successful",
        "role": "user",
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "profile_pic": user.profile_pic
        }
    })))
}

#[derive(Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

async fn user_profile(
    State(ctx): State<AppContext>,
    Query(query): Query<EmailQuery>,
) -> Json<Value> {
    envelope::respond(user_profile_inner(ctx, query).await)
}

async fn user_profile_inner(ctx: AppContext, query: EmailQuery) -> ClinicResult<Json<Value>> {
    let email = query
        .email
        .ok_or_else(|| ClinicError::Validation("Email required".to_string()))?;

    let user = ctx.users.get_by_email(&email).await?;
    Ok(Json(json!({
        "status": "success",
        "user": {
            "name": user.name,
            "email": user.email,
            "age": user.age,
            "blood_group": user.blood_type,
            "gender": user.gender,
            "profile_pic": user.profile_pic
        }
    })))
}

async fn update_profile(State(ctx): State<AppContext>, multipart: Multipart) -> Json<Value> {
    envelope::respond(update_profile_inner(ctx, multipart).await)
}

async fn update_profile_inner(ctx: AppContext, multipart: Multipart) -> ClinicResult<Json<Value>> {
    let form = read_profile_form(multipart).await?;

    let (Some(email), Some(name)) = (form.email, form.name) else {
        return Err(ClinicError::Validation(
            "Name and Email required".to_string(),
        ));
    };

    let profile_pic = match form.profile_pic {
        Some((filename, bytes)) => {
            Some(uploads::save_upload(&ctx.config.uploads.directory, &filename, &bytes).await?)
        }
        None => None,
    };

    let user = ctx
        .users
        .update_profile(
            &email,
            ProfileUpdate {
                name,
                age: form.age.and_then(|a| a.parse().ok()),
                blood_type: form.blood_group,
                gender: form.gender,
                profile_pic,
            },
        )
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Profile updated successfully",
        "newPic": user.profile_pic
    })))
}
