mod new;
mod plan;
