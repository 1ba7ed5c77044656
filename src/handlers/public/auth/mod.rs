// handlers/public/auth/mod.rs - Token acquisition endpoints

pub mod login;  // POST /api/auth/login - verify credentials, issue JWT
pub mod signup; // POST /api/auth/signup - register an institutional account

pub use login::login_post;
pub use signup::signup_post;

/*
AUTHENTICATION FLOW:

1. **Signup**: POST /api/auth/signup
   - Input: { "name", "email", "password" }
   - Email must carry the configured institutional suffix
   - Returns 201 { "message": "User created." }

2. **Login**: POST /api/auth/login
   - Input: { "email", "password" }
   - Returns 200 { "token", "user": { "id", "name", "email" } }
   - Token is valid for one hour and unlocks the protected tier

Every rejection is 400 with a message. Unknown email and wrong password
produce the same message so accounts cannot be enumerated.
*/
