pub const SCHEMA: &str = "
-- Prompt mirror table
CREATE TABLE IF NOT EXISTS prompts (
    id TEXT PRIMARY KEY,                           -- Same identifier as the file store
    name TEXT NOT NULL,                            -- Display name
    content TEXT NOT NULL,                         -- The prompt text
    description TEXT,                              -- Optional description
    category TEXT,                                 -- Optional category
    tags TEXT NOT NULL DEFAULT '[]',               -- JSON array of strings
    is_template INTEGER NOT NULL DEFAULT 0,        -- Boolean flag
    variables TEXT NOT NULL DEFAULT '[]',          -- JSON array of strings
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- Indexes for lookups by name and category
CREATE INDEX IF NOT EXISTS idx_prompts_name ON prompts(name);
CREATE INDEX IF NOT EXISTS idx_prompts_category ON prompts(category);
";
