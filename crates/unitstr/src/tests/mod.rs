mod classify;
mod cow;
