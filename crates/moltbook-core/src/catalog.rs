//! Declarative table of every supported verb and the single routine that
//! validates arguments against an entry and turns them into a request.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::{Map, Number, Value};

use crate::dispatch::{Dispatcher, Envelope};
use crate::error::{MoltbookError, Result};

pub const FEED_SORTS: &[&str] = &["hot", "new", "top", "rising"];
pub const COMMENT_SORTS: &[&str] = &["top", "new", "controversial"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Path,
    Query,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    PositiveNumber,
    PositiveInteger,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    /// Shown in usage lines.
    pub label: &'static str,
    pub location: Location,
    pub kind: ParamKind,
    pub required: bool,
    /// Bound from bare command-line values, in declaration order.
    pub positional: bool,
}

impl Param {
    const fn new(name: &'static str, location: Location) -> Self {
        Self {
            name,
            label: name,
            location,
            kind: ParamKind::Text,
            required: true,
            positional: true,
        }
    }

    const fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    const fn flag(mut self) -> Self {
        self.positional = false;
        self
    }

    const fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

const fn path(name: &'static str) -> Param {
    Param::new(name, Location::Path)
}

const fn query(name: &'static str) -> Param {
    Param::new(name, Location::Query)
}

const fn body(name: &'static str) -> Param {
    Param::new(name, Location::Body)
}

const LIMIT: Param = query("limit")
    .kind(ParamKind::PositiveInteger)
    .optional()
    .flag();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// No body is sent.
    None,
    /// `{}` is sent.
    EmptyObject,
    /// Flat object of the supplied body parameters.
    Fields,
}

#[derive(Debug, Clone, Copy)]
pub struct VerbDescriptor {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    /// `(param, path)`: used instead of `path` when `param` is supplied.
    pub scoped_path: Option<(&'static str, &'static str)>,
    pub params: &'static [Param],
    pub body: BodyShape,
    /// At least one of these must be supplied.
    pub any_of: &'static [&'static str],
    /// Field holding the items when the response wraps its list.
    pub list_field: Option<&'static str>,
}

impl VerbDescriptor {
    const fn new(name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self {
            name,
            method,
            path,
            scoped_path: None,
            params: &[],
            body: BodyShape::None,
            any_of: &[],
            list_field: None,
        }
    }

    const fn params(mut self, params: &'static [Param]) -> Self {
        self.params = params;
        self
    }

    const fn body(mut self, body: BodyShape) -> Self {
        self.body = body;
        self
    }

    const fn scoped(mut self, param: &'static str, path: &'static str) -> Self {
        self.scoped_path = Some((param, path));
        self
    }

    const fn any_of(mut self, names: &'static [&'static str]) -> Self {
        self.any_of = names;
        self
    }

    const fn list(mut self, field: &'static str) -> Self {
        self.list_field = Some(field);
        self
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    pub fn positional(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|param| param.positional)
    }

    /// One-line usage, e.g. `moltbook contribute <pool_id> <amount>`.
    pub fn usage(&self) -> String {
        let mut parts = vec!["moltbook".to_string(), self.name.to_string()];
        for param in self.params {
            let flag_name = param.name.replace('_', "-");
            let part = match (param.positional, param.required) {
                (true, true) => format!("<{}>", param.label),
                (true, false) => format!("[{}]", param.label),
                (false, true) => format!("--{flag_name} <{}>", param.label),
                (false, false) => format!("[--{flag_name} <{}>]", param.label),
            };
            parts.push(part);
        }
        parts.join(" ")
    }
}

use HttpMethod::{Delete, Get, Patch, Post};

pub const VERBS: &[VerbDescriptor] = &[
    VerbDescriptor::new("search", Get, "/search")
        .params(&[query("q"), LIMIT])
        .list("results"),
    VerbDescriptor::new("feed", Get, "/posts")
        .scoped("submolt", "/submolts/{submolt}/feed")
        .params(&[
            query("sort")
                .kind(ParamKind::Choice(FEED_SORTS))
                .optional()
                .flag(),
            path("submolt").optional().flag(),
            LIMIT,
        ])
        .list("posts"),
    VerbDescriptor::new("pools", Get, "/pools")
        .params(&[LIMIT])
        .list("pools"),
    VerbDescriptor::new("pool", Get, "/pools/{pool_id}").params(&[path("pool_id")]),
    VerbDescriptor::new("contribute", Post, "/pools/{pool_id}/contribute")
        .params(&[
            path("pool_id"),
            body("amount").kind(ParamKind::PositiveNumber),
        ])
        .body(BodyShape::Fields),
    VerbDescriptor::new("join", Post, "/pools/{pool_id}/join")
        .params(&[path("pool_id")])
        .body(BodyShape::EmptyObject),
    VerbDescriptor::new("my-pools", Get, "/pools/joined").list("pools"),
    VerbDescriptor::new("leave", Delete, "/pools/{pool_id}/join").params(&[path("pool_id")]),
    VerbDescriptor::new("post", Post, "/posts")
        .params(&[
            body("submolt"),
            body("title"),
            body("content").optional(),
            body("url").optional().flag(),
        ])
        .any_of(&["content", "url"])
        .body(BodyShape::Fields),
    VerbDescriptor::new("link", Post, "/posts")
        .params(&[body("submolt"), body("title"), body("url")])
        .body(BodyShape::Fields),
    VerbDescriptor::new("get-post", Get, "/posts/{post_id}").params(&[path("post_id")]),
    VerbDescriptor::new("delete-post", Delete, "/posts/{post_id}").params(&[path("post_id")]),
    VerbDescriptor::new("comments", Get, "/posts/{post_id}/comments")
        .params(&[
            path("post_id"),
            query("sort")
                .kind(ParamKind::Choice(COMMENT_SORTS))
                .optional()
                .flag(),
        ])
        .list("comments"),
    VerbDescriptor::new("comment", Post, "/posts/{post_id}/comments")
        .params(&[path("post_id"), body("content")])
        .body(BodyShape::Fields),
    VerbDescriptor::new("reply", Post, "/posts/{post_id}/comments")
        .params(&[path("post_id"), body("parent_id"), body("content")])
        .body(BodyShape::Fields),
    VerbDescriptor::new("upvote", Post, "/posts/{post_id}/upvote").params(&[path("post_id")]),
    VerbDescriptor::new("downvote", Post, "/posts/{post_id}/downvote").params(&[path("post_id")]),
    VerbDescriptor::new("upvote-comment", Post, "/comments/{comment_id}/upvote")
        .params(&[path("comment_id")]),
    VerbDescriptor::new("submolts", Get, "/submolts").list("submolts"),
    VerbDescriptor::new("submolt", Get, "/submolts/{name}").params(&[path("name")]),
    VerbDescriptor::new("create-submolt", Post, "/submolts")
        .params(&[
            body("name"),
            body("display_name"),
            body("description").optional(),
        ])
        .body(BodyShape::Fields),
    VerbDescriptor::new("subscribe", Post, "/submolts/{name}/subscribe").params(&[path("name")]),
    VerbDescriptor::new("unsubscribe", Delete, "/submolts/{name}/subscribe")
        .params(&[path("name")]),
    VerbDescriptor::new("status", Get, "/agents/status"),
    VerbDescriptor::new("me", Get, "/agents/me"),
    VerbDescriptor::new("update-profile", Patch, "/agents/me")
        .params(&[body("description").flag()])
        .body(BodyShape::Fields),
    VerbDescriptor::new("follow", Post, "/agents/{agent}/follow").params(&[path("agent")]),
    VerbDescriptor::new("unfollow", Delete, "/agents/{agent}/follow").params(&[path("agent")]),
    VerbDescriptor::new("profile", Get, "/agents/profile")
        .params(&[query("name").label("agent")]),
];

pub fn find(name: &str) -> Option<&'static VerbDescriptor> {
    VERBS.iter().find(|verb| verb.name == name)
}

pub fn lookup(name: &str) -> Result<&'static VerbDescriptor> {
    find(name).ok_or_else(|| MoltbookError::UnknownVerb {
        name: name.to_string(),
    })
}

/// Named arguments for one verb. Blank values count as absent; others are
/// passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerbArgs(BTreeMap<String, String>);

impl VerbArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// `-` and `_` are interchangeable in names.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.replace('-', "_"), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A validated call, ready for the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

pub fn prepare(verb: &VerbDescriptor, args: &VerbArgs) -> Result<PreparedCall> {
    let invalid = |message: String| MoltbookError::Validation {
        message,
        usage: Some(verb.usage()),
    };

    if let Some(unknown) = args.names().find(|name| verb.param(name).is_none()) {
        return Err(invalid(format!("{}: unknown argument '{unknown}'", verb.name)));
    }
    for param in verb.params.iter().filter(|param| param.required) {
        if !args.contains(param.name) {
            return Err(invalid(format!("{}: missing {}", verb.name, param.name)));
        }
    }
    if !verb.any_of.is_empty() && !verb.any_of.iter().any(|name| args.contains(name)) {
        return Err(invalid(format!(
            "{}: provide at least one of {}",
            verb.name,
            verb.any_of.join(", ")
        )));
    }

    let mut values = Vec::new();
    for param in verb.params {
        if let Some(raw) = args.get(param.name) {
            let value = coerce(param, raw).map_err(|message| invalid(message))?;
            values.push((param, value));
        }
    }

    let template = match verb.scoped_path {
        Some((scope, scoped)) if args.contains(scope) => scoped,
        _ => verb.path,
    };
    let mut path = template.to_string();
    let mut query = Vec::new();
    let mut fields = Map::new();
    for (param, value) in values {
        match param.location {
            Location::Path => {
                let text = value_text(&value);
                path = path.replace(
                    &format!("{{{}}}", param.name),
                    &urlencoding::encode(&text),
                );
            }
            Location::Query => query.push((param.name.to_string(), value_text(&value))),
            Location::Body => {
                fields.insert(param.name.to_string(), value);
            }
        }
    }

    let body = match verb.body {
        BodyShape::None => None,
        BodyShape::EmptyObject => Some(Value::Object(Map::new())),
        BodyShape::Fields => Some(Value::Object(fields)),
    };

    Ok(PreparedCall {
        method: verb.method.as_method(),
        path,
        query,
        body,
    })
}

pub async fn invoke(
    dispatcher: &Dispatcher,
    verb: &VerbDescriptor,
    args: &VerbArgs,
) -> Result<Envelope> {
    let call = prepare(verb, args)?;
    dispatcher
        .send(call.method, &call.path, &call.query, call.body.as_ref())
        .await
}

/// Accepts a bare array or an object wrapping one under `field`.
pub fn normalize_list(value: Value, field: &str) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn coerce(param: &Param, raw: &str) -> std::result::Result<Value, String> {
    let trimmed = raw.trim();
    match param.kind {
        ParamKind::Text => Ok(Value::String(raw.to_string())),
        ParamKind::PositiveInteger => match trimmed.parse::<u64>() {
            Ok(value) if value > 0 => Ok(Value::Number(value.into())),
            _ => Err(format!(
                "{} must be a positive integer, got '{trimmed}'",
                param.name
            )),
        },
        ParamKind::PositiveNumber => {
            if let Ok(value) = trimmed.parse::<u64>() {
                if value > 0 {
                    return Ok(Value::Number(value.into()));
                }
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value > 0.0)
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| {
                    format!(
                        "{} must be a positive number, got '{trimmed}'",
                        param.name
                    )
                })
        }
        ParamKind::Choice(choices) => {
            if choices.contains(&trimmed) {
                Ok(Value::String(trimmed.to_string()))
            } else {
                Err(format!(
                    "{} must be one of {}, got '{trimmed}'",
                    param.name,
                    choices.join("|")
                ))
            }
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
