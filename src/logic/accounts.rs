//! User registration and lookup.

use crate::models::{NewUser, Role, TennisError, User, UserId};
use crate::store::Store;

/// Register a user. Usernames and emails are unique (case-insensitive).
pub fn register_user(store: &mut Store, new: NewUser) -> Result<User, TennisError> {
    let username = new.username.trim();
    let email = new.email.trim();
    if username.is_empty() {
        return Err(TennisError::validation("Username is required."));
    }
    if !email.contains('@') {
        return Err(TennisError::validation("Enter a valid email address."));
    }
    if store
        .users
        .any(|u| u.username.eq_ignore_ascii_case(username))
    {
        return Err(TennisError::validation("Username already exists."));
    }
    if store.users.any(|u| u.email.eq_ignore_ascii_case(email)) {
        return Err(TennisError::validation("Email already exists."));
    }

    let mut user = User::new(username, email, new.role);
    user.phone = new.phone;
    user.bio = new.bio;
    let user = store.users.insert(user);
    log::info!("Registered {} as {:?}", user.username, user.role());
    Ok(user)
}

pub fn get_user(store: &Store, id: UserId) -> Result<User, TennisError> {
    store.users.get(id).cloned()
}

/// Users with the given role, in registration order.
pub fn get_users_by_role(store: &Store, role: Role) -> Vec<User> {
    store
        .users
        .filter(|u| u.role() == role)
        .into_iter()
        .cloned()
        .collect()
}
