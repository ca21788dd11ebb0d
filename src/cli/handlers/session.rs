use std::error::Error;

use super::{Context, finish};
use crate::cli::commands::LoginArgs;
use crate::cli::output::user_to_json;
use crate::model::User;
use crate::ops::{Feedback, SessionGate};

pub fn cmd_login(args: LoginArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut gate = SessionGate::new();
    let mut feedback = Feedback::new();
    let user = User::new(args.name.trim(), args.email.filter(|e| !e.trim().is_empty()));
    if !gate.login(ctx.client.auth.as_ref(), user, &mut feedback) {
        return finish(&mut feedback, ctx.json);
    }
    if let Some(user) = gate.user() {
        if ctx.json {
            println!("{}", serde_json::to_string_pretty(&user_to_json(user))?);
        } else {
            println!("logged in as {}", user.name);
        }
    }
    Ok(())
}

pub fn cmd_logout(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut gate = SessionGate::new();
    let mut feedback = Feedback::new();
    gate.resolve(ctx.client.auth.as_ref(), &mut feedback);
    gate.logout(ctx.client.auth.as_ref(), &mut feedback);
    finish(&mut feedback, ctx.json)?;
    if !ctx.json {
        println!("logged out");
    }
    Ok(())
}

pub fn cmd_whoami(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut gate = SessionGate::new();
    let mut feedback = Feedback::new();
    gate.resolve(ctx.client.auth.as_ref(), &mut feedback);
    finish(&mut feedback, ctx.json)?;
    let user = gate.require_user()?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&user_to_json(user))?);
    } else {
        match &user.email {
            Some(email) => println!("{} <{}>", user.name, email),
            None => println!("{}", user.name),
        }
    }
    Ok(())
}
