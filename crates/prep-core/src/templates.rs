//! Fixed file contents written during the migration.

use crate::public_path::PublicPathDecision;

pub const ARTISAN: &str = r#"#!/usr/bin/env php
<?php

use Illuminate\Foundation\Application;
use Symfony\Component\Console\Input\ArgvInput;

define('LARAVEL_START', microtime(true));

// Register the Composer autoloader...
require __DIR__.'/vendor/autoload.php';

// Bootstrap Laravel and handle the command...
/** @var Application $app */
$app = require_once __DIR__.'/bootstrap/app.php';

$status = $app->handleCommand(new ArgvInput);

exit($status);
"#;

const APP_HEAD: &str = r#"<?php

use Illuminate\Foundation\Application;
use Illuminate\Foundation\Configuration\Exceptions;
use Illuminate\Foundation\Configuration\Middleware;

return Application::configure(basePath: dirname(__DIR__))
    ->withRouting(
        health: '/up',
    )
    ->withMiddleware(function (Middleware $middleware): void {
        //
    })
    ->withExceptions(function (Exceptions $exceptions): void {
        //
    })
"#;

pub const INDEX: &str = r#"<?php

use Illuminate\Foundation\Application;
use Illuminate\Http\Request;

define('LARAVEL_START', microtime(true));

// Determine if the application is in maintenance mode...
if (file_exists($maintenance = __DIR__.'/../storage/framework/maintenance.php')) {
    require $maintenance;
}

// Register the Composer autoloader...
require __DIR__.'/../vendor/autoload.php';

// Bootstrap Laravel and handle the request...
/** @var Application $app */
$app = require_once __DIR__.'/../bootstrap/app.php';

$app->handleRequest(Request::capture());
"#;

/// Ignore everything in a cache directory except this file.
pub const CACHE_GITIGNORE: &str = "*\n!.gitignore";

/// `bootstrap/app.php`. A public path that stays non-canonical is declared
/// explicitly.
pub fn bootstrap_app(public: &PublicPathDecision) -> String {
    let mut contents = APP_HEAD.to_string();
    if !public.is_canonical() && !public.rename_requested {
        contents.push_str(&format!(
            "    ->usePublicPath(base_path('{}'))\n",
            public.relative_path
        ));
    }
    contents.push_str("    ->create();\n");
    contents
}
