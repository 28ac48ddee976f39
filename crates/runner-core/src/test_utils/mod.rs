pub mod mock_piston_server;
pub mod scripted_executor;
