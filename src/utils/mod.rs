pub mod fs_move;
