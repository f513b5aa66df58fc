mod prototype;
mod walk;
